//! Coloured presentation on top of a clap command
//!
//! [`JamParser`] leaves grammar and tokenizing to clap and owns only what the
//! user sees: the usage banner, the help text, the version banner and the
//! error exit.

use std::ffi::OsString;
use std::io::{self, Write};

use clap::error::ErrorKind;
use clap::{ColorChoice, Command, CommandFactory};

use crate::cli::args::ParsedArgs;
use crate::output::terminal;
use crate::status::ExitStatus;

/// Argument parser with custom usage/help/version/error output
#[derive(Debug, Clone)]
pub struct JamParser {
    command: Command,
    prog: String,
    version: String,
    url: String,
    colors: bool,
}

impl JamParser {
    /// Wrap a clap command. The program name and version come from the command.
    ///
    /// clap's own version flag is disabled because the run guard handles the
    /// version flags before parsing.
    pub fn new(command: Command) -> Self {
        let prog = command.get_name().to_string();
        let version = command.get_version().unwrap_or_default().to_string();
        let command = command.disable_version_flag(true).color(ColorChoice::Never);

        Self {
            command,
            prog,
            version,
            url: String::new(),
            colors: true,
        }
    }

    /// Build from a derived `clap::Parser`
    pub fn from_parser<P: CommandFactory>() -> Self {
        Self::new(P::command())
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Emit ANSI colours in banners and error messages
    pub fn color(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    pub fn prog(&self) -> &str {
        &self.prog
    }

    pub fn version_str(&self) -> &str {
        &self.version
    }

    pub fn colors(&self) -> bool {
        self.colors
    }

    fn title_line(&self) -> String {
        terminal::banner(&format!("{} v{}", self.prog, self.version), self.colors)
    }

    /// Three-line banner: title, URL and an empty line
    pub fn usage_banner(&self) -> String {
        let lines = [
            format!("  {}", self.title_line()),
            format!("  {}", self.url),
            String::new(),
        ];
        lines.join("\n")
    }

    /// Full help text with its first character upper-cased
    pub fn help_text(&mut self) -> String {
        let help = self.command.render_help().to_string();
        let mut chars = help.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => help,
        }
    }

    pub fn write_usage<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.usage_banner().as_bytes())?;
        out.flush()
    }

    pub fn print_usage(&self) -> io::Result<()> {
        self.write_usage(&mut io::stdout())
    }

    pub fn write_help<W: Write + ?Sized>(&mut self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.help_text())?;
        out.flush()
    }

    pub fn print_help(&mut self) -> io::Result<()> {
        self.write_help(&mut io::stdout())
    }

    pub fn write_version<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.title_line())?;
        out.flush()
    }

    /// Single coloured `"<prog> v<version>"` line on stdout
    pub fn print_version(&self) -> io::Result<()> {
        self.write_version(&mut io::stdout())
    }

    /// Write `message` in red (when non-empty) and hand back `status`
    pub fn write_exit<W: Write + ?Sized>(
        &self,
        err: &mut W,
        status: ExitStatus,
        message: Option<&str>,
    ) -> io::Result<ExitStatus> {
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            writeln!(err, "{}", terminal::error(message, self.colors))?;
            err.flush()?;
        }
        Ok(status)
    }

    /// Write `message` to stderr and terminate the process with `status`
    pub fn exit(&self, status: ExitStatus, message: Option<&str>) -> ! {
        // Nothing sensible is left to do if stderr itself is gone.
        let _ = self.write_exit(&mut io::stderr(), status, message);
        std::process::exit(status.code())
    }

    /// Usage banner followed by `"[<prog>] Error: <message>"`
    pub fn write_error<W: Write + ?Sized>(&self, err: &mut W, message: &str) -> io::Result<ExitStatus> {
        self.write_usage(err)?;
        let formatted = format!("[{}] Error: {}", self.prog, message);
        self.write_exit(err, ExitStatus::Usage, Some(&formatted))
    }

    /// Report an argument error on stderr and terminate with status 2
    pub fn error(&self, message: &str) -> ! {
        let _ = self.write_usage(&mut io::stderr());
        let formatted = format!("[{}] Error: {}", self.prog, message);
        self.exit(ExitStatus::Usage, Some(&formatted))
    }

    /// Run the clap grammar over a full command line (program name first)
    pub fn parse_from<I, T>(&mut self, args: I) -> Result<ParsedArgs, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.command.try_get_matches_from_mut(args).map(ParsedArgs::new)
    }

    /// Turn a clap error into our output and an exit status.
    ///
    /// Help requests print the capitalized help and succeed; everything else
    /// goes through [`JamParser::write_error`].
    pub fn handle_parse_error<O, E>(
        &mut self,
        error: &clap::Error,
        stdout: &mut O,
        stderr: &mut E,
    ) -> io::Result<ExitStatus>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        match error.kind() {
            ErrorKind::DisplayHelp => {
                self.write_help(stdout)?;
                Ok(ExitStatus::Success)
            }
            ErrorKind::DisplayVersion => {
                self.write_version(stdout)?;
                Ok(ExitStatus::Success)
            }
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                self.write_help(stderr)?;
                Ok(ExitStatus::Usage)
            }
            _ => self.write_error(stderr, &error_detail(error)),
        }
    }
}

/// First paragraph of clap's rendered error on one line, without the
/// `error: ` prefix
pub fn error_detail(error: &clap::Error) -> String {
    let rendered = error.render().to_string();
    let detail = rendered
        .lines()
        .map(str::trim)
        .skip_while(|line| line.is_empty())
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    match detail.strip_prefix("error: ") {
        Some(rest) => rest.to_string(),
        None => detail,
    }
}
