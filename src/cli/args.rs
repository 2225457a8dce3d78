//! Parsed arguments and the argument ids the guard understands
//!
//! The guard only looks at two optional arguments: `out_dir` (where log files
//! go) and `debug` (verbose logging). A grammar that does not define them
//! simply gets the defaults. [`logging_args`] adds both for callers who want
//! them.

use std::any::Any;
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, FromArgMatches};

/// First arguments that short-circuit into the version banner
pub const VERSION_FLAGS: [&str; 4] = ["-v", "--v", "-version", "--version"];

/// Argument id holding the log output directory
pub const OUT_DIR_ARG: &str = "out_dir";

/// Argument id of the debug switch
pub const DEBUG_ARG: &str = "debug";

/// Is this argument one of the version flags?
pub fn is_version_flag(arg: &str) -> bool {
    VERSION_FLAGS.contains(&arg)
}

/// `--out-dir <DIR>` and `--debug` in the shape the guard reads them
pub fn logging_args() -> [Arg; 2] {
    [
        Arg::new(OUT_DIR_ARG)
            .long("out-dir")
            .short('o')
            .value_name("DIR")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Directory for log files (defaults to the current directory)"),
        Arg::new(DEBUG_ARG)
            .long("debug")
            .action(ArgAction::SetTrue)
            .help("Enable debug logging"),
    ]
}

/// Immutable result of parsing one command line
#[derive(Debug, Clone)]
pub struct ParsedArgs {
    matches: ArgMatches,
}

impl ParsedArgs {
    pub fn new(matches: ArgMatches) -> Self {
        Self { matches }
    }

    /// Underlying clap matches
    pub fn matches(&self) -> &ArgMatches {
        &self.matches
    }

    /// Value of `id`, or `None` when it is absent, undefined, or of another type
    pub fn get_one<T: Any + Clone + Send + Sync + 'static>(&self, id: &str) -> Option<&T> {
        self.matches.try_get_one::<T>(id).ok().flatten()
    }

    /// State of a `SetTrue`/`SetFalse` flag, `None` when the grammar lacks it
    pub fn flag(&self, id: &str) -> Option<bool> {
        self.get_one::<bool>(id).copied()
    }

    /// Log directory from the `out_dir` argument, path- or string-typed
    pub fn out_dir(&self) -> Option<PathBuf> {
        self.get_one::<PathBuf>(OUT_DIR_ARG)
            .cloned()
            .or_else(|| self.get_one::<String>(OUT_DIR_ARG).map(PathBuf::from))
    }

    /// Whether `debug` is defined and set (flag or counter)
    pub fn debug(&self) -> bool {
        self.flag(DEBUG_ARG)
            .or_else(|| self.get_one::<u8>(DEBUG_ARG).map(|count| *count > 0))
            .unwrap_or(false)
    }

    /// Convert into a derived `clap::Parser` struct
    pub fn to_typed<T: FromArgMatches>(&self) -> Result<T, clap::Error> {
        T::from_arg_matches(&self.matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Command, Parser};

    fn parse(cmd: Command, args: &[&str]) -> ParsedArgs {
        ParsedArgs::new(cmd.try_get_matches_from(args).unwrap())
    }

    #[test]
    fn test_version_flags() {
        for flag in ["-v", "--v", "-version", "--version"] {
            assert!(is_version_flag(flag));
        }
        assert!(!is_version_flag("-V"));
        assert!(!is_version_flag("version"));
    }

    #[test]
    fn test_logging_args() {
        let cmd = Command::new("demo").args(logging_args());
        let args = parse(cmd, &["demo", "--out-dir", "/tmp/logs", "--debug"]);
        assert_eq!(args.out_dir(), Some(PathBuf::from("/tmp/logs")));
        assert!(args.debug());
    }

    #[test]
    fn test_missing_optional_args() {
        let cmd = Command::new("demo").args(logging_args());
        let args = parse(cmd, &["demo"]);
        assert_eq!(args.out_dir(), None);
        assert!(!args.debug());
    }

    #[test]
    fn test_undefined_args() {
        let cmd = Command::new("demo").arg(Arg::new("name"));
        let args = parse(cmd, &["demo", "x"]);
        assert_eq!(args.out_dir(), None);
        assert!(!args.debug());
        assert_eq!(args.flag("debug"), None);
        assert_eq!(args.get_one::<String>("name"), Some(&"x".to_string()));
    }

    #[test]
    fn test_string_out_dir_and_counted_debug() {
        let cmd = Command::new("demo")
            .arg(Arg::new("out_dir").long("out-dir"))
            .arg(Arg::new("debug").short('d').action(ArgAction::Count));
        let args = parse(cmd, &["demo", "--out-dir", "logs", "-dd"]);
        assert_eq!(args.out_dir(), Some(PathBuf::from("logs")));
        assert!(args.debug());
    }

    #[derive(Parser, Debug)]
    struct Demo {
        #[arg(long)]
        count: u32,
    }

    #[test]
    fn test_to_typed() {
        use clap::CommandFactory;
        let args = parse(Demo::command(), &["demo", "--count", "3"]);
        let demo: Demo = args.to_typed().unwrap();
        assert_eq!(demo.count, 3);
    }
}
