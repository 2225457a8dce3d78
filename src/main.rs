//! Demonstration program for the run guard.
//!
//! Sums integers given on the command line (and optionally read from a
//! file), then divides the total. Each way it can fail exercises one branch of
//! the guard:
//!
//! - a non-integer argument or a negative `--limit` is a grammar error (exit 2)
//! - `--limit` exceeded, an overflowing total, or a non-integer in `--from`,
//!   is a controlled failure
//! - an unreadable `--from` file or `--divisor 0` is an unexpected failure
//! - Ctrl+C (or the hidden `--interrupt`) is a user interrupt

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use jamparse::context::color_enabled;
use jamparse::core;
use jamparse::errors::{Failure, JamError};
use jamparse::logging::DEFAULT_TARGET;
use jamparse::signals;
use jamparse::{ExitStatus, JamParser};

const TITLE: &str = "jamparse";
const VERSION: &str = env!("CARGO_PKG_VERSION");
const URL: &str = "https://docs.rs/jamparse";

/// sum integers and divide the total
#[derive(Parser, Debug)]
#[command(name = "jamparse")]
struct Args {
    /// Integers to add up
    #[arg(required = true, allow_negative_numbers = true)]
    numbers: Vec<i64>,

    /// Divide the total by this value
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    divisor: i64,

    /// Fail when the total exceeds this value
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Also read whitespace-separated integers from FILE
    #[arg(long, value_name = "FILE")]
    from: Option<PathBuf>,

    /// Directory for log files (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Behave as if Ctrl+C had been pressed
    #[arg(long, hide = true)]
    interrupt: bool,
}

fn main() -> ExitStatus {
    let parser = JamParser::from_parser::<Args>().version(VERSION).url(URL);
    let validator = parser.clone().color(color_enabled(atty::Stream::Stderr));

    core::run_main(parser, TITLE, VERSION, |parsed| {
        let args: Args = parsed.to_typed()?;
        if args.limit.is_some_and(|limit| limit < 0) {
            validator.error("--limit must not be negative");
        }
        sum(&args)
    })
}

fn sum(args: &Args) -> Result<ExitStatus, Failure> {
    let interrupt = signals::global();
    if args.interrupt {
        interrupt.set_interrupted();
    }

    let mut numbers = args.numbers.clone();
    if let Some(path) = &args.from {
        numbers.extend(read_numbers(path).map_err(Failure::from_anyhow)?);
    }

    interrupt.check()?;

    let total = numbers
        .iter()
        .try_fold(0i64, |acc, &n| acc.checked_add(n))
        .ok_or_else(|| JamError::Argument("total does not fit in a 64-bit integer".to_string()))?;
    if let Some(limit) = args.limit {
        if total > limit {
            return Err(JamError::Warning(format!("total {} exceeds limit {}", total, limit)).into());
        }
    }

    let result = total / args.divisor;
    info!(target: DEFAULT_TARGET, count = numbers.len(), total, result, "Summed numbers");
    println!("{}", result);

    Ok(ExitStatus::Success)
}

fn read_numbers(path: &Path) -> anyhow::Result<Vec<i64>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    content
        .split_whitespace()
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| anyhow::Error::new(JamError::Argument(format!("not an integer: {}", token))))
        })
        .collect()
}
