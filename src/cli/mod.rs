//! CLI argument parsing and presentation

pub mod args;
pub mod parser;

// Re-exports
pub use args::{is_version_flag, logging_args, ParsedArgs, DEBUG_ARG, OUT_DIR_ARG, VERSION_FLAGS};
pub use parser::JamParser;
