//! jamparse library interface
//!
//! Coloured argument parsing on top of clap, and a run guard that turns every
//! way a command-line program can end into a logged, deterministic exit code.
//!
//! # Module Organization
//!
//! - [`cli`] - Custom parser (JamParser) and parsed arguments
//! - [`core`] - The run guard (run, run_main)
//! - [`errors`] - Domain error and failure outcome (JamError, Failure)
//! - [`logging`] - The `default` and `warnings` log channels
//! - [`signals`] - Interrupt handling (Interrupt, install_handler)
//! - [`status`] - Exit status codes (ExitStatus)
//!
//! # Example
//!
//! ```no_run
//! use clap::Command;
//! use jamparse::cli::{logging_args, JamParser};
//! use jamparse::errors::JamError;
//!
//! let parser = JamParser::new(Command::new("demo").args(logging_args()))
//!     .version("1.2.3")
//!     .url("https://example.org/demo");
//!
//! let status = jamparse::core::run_main(parser, "demo", "1.2.3", |args| {
//!     if args.debug() {
//!         return Err(JamError::msg("bad config").into());
//!     }
//!     Ok(())
//! });
//! std::process::exit(status.code());
//! ```

pub mod cli;
pub mod context;
pub mod core;
pub mod errors;
pub mod logging;
pub mod output;
pub mod signals;
pub mod status;
pub mod unwind;

pub use cli::{JamParser, ParsedArgs};
pub use errors::{Failure, FailureDetail, JamError};
pub use status::ExitStatus;
