//! The run guard: one CLI invocation from raw arguments to exit status.
//!
//! [`run`] special-cases an empty command line and the version flags, parses
//! the rest, opens the log channels and runs caller logic inside them. Every
//! way out of the caller logic is logged and mapped to an [`ExitStatus`];
//! nothing propagates past the guard.

use std::ffi::OsString;

use tracing::{debug, error, info};

use crate::cli::{is_version_flag, JamParser, ParsedArgs};
use crate::context::Environment;
use crate::errors::{Failure, FailureDetail};
use crate::logging::{warning_block, LogConfig, Logger, DEFAULT_TARGET, WARNINGS_TARGET};
use crate::signals;
use crate::status::ExitStatus;
use crate::unwind;

pub const INTERRUPT_MESSAGE: &str = "Controlled exit resulting from keyboard interrupt.";

pub const CONTROLLED_MESSAGE: &str =
    "Controlled exit resulting from an unrecoverable error or warning (see warnings.log).";

pub const CONTROLLED_HEADER: &str =
    "Controlled exit resulting from an unrecoverable error or warning.";

pub const UNCONTROLLED_MESSAGE: &str =
    "Uncontrolled exit resulting from an unexpected error (see warnings.log).";

pub const UNCONTROLLED_HEADER: &str = "Uncontrolled exit resulting from an unexpected error.";

/// Run `body` under the guard.
///
/// `args` is the full command line, program name first. Arguments need not be
/// valid UTF-8; the grammar decides what to do with them. Exit statuses:
///
/// - no arguments: usage banner on stdout, `Error`
/// - leading version flag: version banner on stdout, `Success`
/// - rejected by the grammar: usage banner and error on stderr, `Usage`
/// - interrupt, [`Failure`] or panic in `body`: logged, `Error`
/// - otherwise whatever `body` returned
pub fn run<I, A, F, T>(
    parser: JamParser,
    title: &str,
    version: &str,
    args: I,
    env: &mut Environment,
    body: F,
) -> ExitStatus
where
    I: IntoIterator<Item = A>,
    A: Into<OsString>,
    F: FnOnce(&ParsedArgs) -> Result<T, Failure>,
    T: Into<ExitStatus>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let out_colors = parser.colors() && env.colors;
    let err_colors = parser.colors() && env.stderr_colors;
    let mut parser = parser.color(out_colors);

    if args.len() <= 1 {
        parser.write_usage(&mut *env.stdout).ok();
        return ExitStatus::Error;
    }

    if args[1].to_str().is_some_and(is_version_flag) {
        parser.write_version(&mut *env.stdout).ok();
        return ExitStatus::Success;
    }

    let parsed = parser.parse_from(&args);

    // Only stderr gets coloured output from here on
    let mut parser = parser.color(err_colors);

    let parsed = match parsed {
        Ok(parsed) => parsed,
        Err(e) => {
            return parser
                .handle_parse_error(&e, &mut *env.stdout, &mut *env.stderr)
                .unwrap_or(ExitStatus::Usage);
        }
    };

    let config = LogConfig::new(title, version)
        .out_dir(parsed.out_dir())
        .debug(parsed.debug())
        .ansi(err_colors)
        .console_filter(env.log_filter.clone());

    let logger = match Logger::init(&config) {
        Ok(logger) => logger,
        Err(e) => {
            let message = format!("[{}] Error: failed to initialize logging: {}", title, e);
            parser
                .write_exit(&mut *env.stderr, ExitStatus::Error, Some(&message))
                .ok();
            return ExitStatus::Error;
        }
    };

    let interrupt = env.interrupt.clone();
    interrupt.attach_log(logger.dispatch().clone());

    let status = logger.in_scope(|| {
        debug!(target: DEFAULT_TARGET, title, version, "Running");

        let outcome = match unwind::catch(|| body(&parsed)) {
            Ok(result) => result,
            Err(panic) => Err(Failure::Uncontrolled(panic)),
        };

        if interrupt.was_interrupted() {
            conclude::<T>(Err(Failure::Interrupted))
        } else {
            conclude(outcome)
        }
    });

    interrupt.detach_log();
    status
}

/// [`run`] over the real process: installs the Ctrl+C handler and reads
/// `std::env::args_os`.
pub fn run_main<F, T>(parser: JamParser, title: &str, version: &str, body: F) -> ExitStatus
where
    F: FnOnce(&ParsedArgs) -> Result<T, Failure>,
    T: Into<ExitStatus>,
{
    if let Err(e) = signals::install_handler() {
        eprintln!("Warning: failed to install Ctrl+C handler: {}", e);
    }

    let mut env = Environment::init();
    run(parser, title, version, std::env::args_os(), &mut env, body)
}

/// Log the outcome of the scoped block and pick the exit status
fn conclude<T: Into<ExitStatus>>(outcome: Result<T, Failure>) -> ExitStatus {
    match outcome {
        Ok(value) => {
            let status = value.into();
            debug!(target: DEFAULT_TARGET, code = status.code(), "Finished");
            status
        }
        Err(Failure::Interrupted) => {
            error!(target: DEFAULT_TARGET, "{}", INTERRUPT_MESSAGE);
            ExitStatus::Error
        }
        Err(Failure::Controlled(detail)) => report(&detail, CONTROLLED_MESSAGE, CONTROLLED_HEADER),
        Err(Failure::Uncontrolled(detail)) => {
            report(&detail, UNCONTROLLED_MESSAGE, UNCONTROLLED_HEADER)
        }
    }
}

fn report(detail: &FailureDetail, message: &str, header: &str) -> ExitStatus {
    if !detail.message.is_empty() {
        error!(target: DEFAULT_TARGET, "{}", detail.message);
    }
    error!(target: DEFAULT_TARGET, "{}", message);
    info!(target: WARNINGS_TARGET, "{}", warning_block(header, detail));
    ExitStatus::Error
}
