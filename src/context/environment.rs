//! Environment struct (stdout/stderr, per-stream colour, interrupt flag)

use std::io::{self, Write};

use crate::signals::{self, Interrupt};

/// Overrides colour detection: `always` or `never`
pub const COLOR_ENV: &str = "JAM_COLOR";

/// `EnvFilter` directives for the console log
pub const LOG_ENV: &str = "JAM_LOG";

/// Execution environment
pub struct Environment {
    pub stdout: Box<dyn Write>,
    pub stderr: Box<dyn Write>,
    /// Colour on stdout (banners)
    pub colors: bool,
    /// Colour on stderr (error lines, console log)
    pub stderr_colors: bool,
    pub log_filter: Option<String>,
    pub interrupt: Interrupt,
}

impl Environment {
    /// Initialize from the real process streams and environment variables
    pub fn init() -> Self {
        Self::default()
    }

    /// Environment writing to the given sinks, without colour and with a
    /// private interrupt flag
    pub fn with_writers(stdout: Box<dyn Write>, stderr: Box<dyn Write>) -> Self {
        Self {
            stdout,
            stderr,
            colors: false,
            stderr_colors: false,
            log_filter: None,
            interrupt: Interrupt::new(),
        }
    }

    /// Colour on both streams
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self.stderr_colors = colors;
        self
    }

    pub fn with_stderr_colors(mut self, colors: bool) -> Self {
        self.stderr_colors = colors;
        self
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
            colors: color_enabled(atty::Stream::Stdout),
            stderr_colors: color_enabled(atty::Stream::Stderr),
            log_filter: std::env::var(LOG_ENV).ok().filter(|v| !v.is_empty()),
            interrupt: signals::global().clone(),
        }
    }
}

/// Whether `stream` of this process should get ANSI colours, from its tty
/// status and the colour environment variables
pub fn color_enabled(stream: atty::Stream) -> bool {
    detect_color_support(
        atty::is(stream),
        std::env::var(COLOR_ENV).ok().as_deref(),
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var("TERM").ok().as_deref(),
    )
}

/// Decide whether to emit ANSI colours
fn detect_color_support(isatty: bool, choice: Option<&str>, no_color: bool, term: Option<&str>) -> bool {
    match choice.map(str::to_ascii_lowercase).as_deref() {
        Some("always") => return true,
        Some("never") => return false,
        _ => {}
    }

    if !isatty || no_color {
        return false;
    }

    !matches!(term, Some("dumb"))
}
