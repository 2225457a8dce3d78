//! Log setup for programs run under the guard
//!
//! Two channels, told apart by `tracing` target:
//!
//! - `default`: everything not aimed at `warnings`. Goes to stderr and to
//!   `<out_dir>/<title>.log`.
//! - `warnings`: full failure reports. File only, `<out_dir>/warnings.log`.
//!
//! [`Logger::init`] never installs a global subscriber. It builds a
//! [`Dispatch`] that the guard enters with [`Logger::in_scope`], so separate
//! invocations in one process keep separate files.

pub mod report;

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing::Dispatch;
use tracing_subscriber::filter::{filter_fn, FilterExt};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::errors::JamError;

pub use report::{warning_block, SEPARATOR_WIDTH};

/// Target of the human-readable channel
pub const DEFAULT_TARGET: &str = "default";

/// Target of the failure-detail channel
pub const WARNINGS_TARGET: &str = "warnings";

/// File name of the warnings channel
pub const WARNINGS_FILE: &str = "warnings.log";

/// Everything the logger needs, passed in explicitly
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory for log files; the current directory when `None`
    pub out_dir: Option<PathBuf>,
    /// File name of the default channel
    pub log_file: String,
    pub title: String,
    pub version: String,
    /// Keep existing log contents instead of truncating
    pub append: bool,
    pub debug: bool,
    /// ANSI colours on the console
    pub ansi: bool,
    /// `EnvFilter` directives replacing the console level
    pub console_filter: Option<String>,
}

impl LogConfig {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            out_dir: None,
            log_file: format!("{}.log", title),
            title,
            version: version.into(),
            append: false,
            debug: false,
            ansi: false,
            console_filter: None,
        }
    }

    pub fn out_dir(mut self, out_dir: Option<PathBuf>) -> Self {
        self.out_dir = out_dir;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn console_filter(mut self, directives: Option<String>) -> Self {
        self.console_filter = directives;
        self
    }

    /// Directory the log files land in
    pub fn dir(&self) -> io::Result<PathBuf> {
        match &self.out_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir(),
        }
    }

    fn level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        }
    }
}

/// An initialized pair of log channels
pub struct Logger {
    dispatch: Dispatch,
    log_path: PathBuf,
    warnings_path: PathBuf,
}

impl Logger {
    /// Create the output directory and both log files, and build the dispatcher.
    pub fn init(config: &LogConfig) -> Result<Self, JamError> {
        let dir = config.dir()?;
        fs::create_dir_all(&dir).map_err(|e| {
            JamError::Config(format!("cannot create log directory {}: {}", dir.display(), e))
        })?;

        let log_path = dir.join(&config.log_file);
        let warnings_path = dir.join(WARNINGS_FILE);

        let mut log_file = open_log(&log_path, config.append)?;
        writeln!(
            log_file,
            "{} v{} started {}",
            config.title,
            config.version,
            chrono::Local::now().to_rfc3339()
        )?;
        let warnings_file = open_log(&warnings_path, config.append)?;

        let level = config.level();
        let default_directive = format!("{}", level);
        let console_filter = config
            .console_filter
            .as_deref()
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(&default_directive));

        let console = fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(config.ansi)
            .with_target(false)
            .without_time()
            .with_filter(filter_fn(not_warnings).and(console_filter));

        let default_file = fmt::layer()
            .with_writer(Mutex::new(log_file))
            .with_ansi(false)
            .with_target(false)
            .with_filter(filter_fn(not_warnings).and(level));

        let warnings = fmt::layer()
            .with_writer(Mutex::new(warnings_file))
            .with_ansi(false)
            .with_target(false)
            .with_level(false)
            .with_filter(filter_fn(|meta| meta.target() == WARNINGS_TARGET));

        let subscriber = tracing_subscriber::registry()
            .with(console)
            .with(default_file)
            .with(warnings);

        let logger = Self {
            dispatch: Dispatch::new(subscriber),
            log_path,
            warnings_path,
        };

        logger.in_scope(|| {
            tracing::debug!(
                target: DEFAULT_TARGET,
                log = %logger.log_path.display(),
                warnings = %logger.warnings_path.display(),
                "Logging initialized"
            );
        });

        Ok(logger)
    }

    /// Run `f` with both channels active on this thread
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// The dispatcher behind both channels, for threads outside [`Logger::in_scope`]
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn warnings_path(&self) -> &Path {
        &self.warnings_path
    }
}

fn not_warnings(meta: &tracing::Metadata<'_>) -> bool {
    meta.target() != WARNINGS_TARGET
}

fn open_log(path: &Path, append: bool) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
}
