//! Error types for jamparse
//!
//! [`JamError`] is the domain error: caller logic returns it to signal a
//! controlled, expected failure. Every other error type reaching the run guard
//! is treated as unexpected. [`Failure`] is the tagged outcome the guard
//! dispatches on.

use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Controlled failure raised by programs built on the guard
#[derive(Error, Debug)]
pub enum JamError {
    #[error("{0}")]
    Message(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("{0}")]
    Warning(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JamError {
    /// Shorthand for a plain message
    pub fn msg(message: impl Into<String>) -> Self {
        JamError::Message(message.into())
    }

    /// Type name written to the warnings log
    pub fn name(&self) -> &'static str {
        match self {
            JamError::Message(_) => "JamError",
            JamError::Config(_) => "JamError::Config",
            JamError::Argument(_) => "JamError::Argument",
            JamError::Warning(_) => "JamError::Warning",
            JamError::Io(_) => "JamError::Io",
        }
    }
}

pub type Result<T> = std::result::Result<T, JamError>;

/// Everything the warnings log needs to know about a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetail {
    pub type_name: String,
    pub message: String,
    pub trace: String,
}

impl FailureDetail {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            trace: trace.into(),
        }
    }

    fn capture(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(type_name, message, Backtrace::force_capture().to_string())
    }
}

/// Outcome of caller logic that did not complete normally
#[derive(Debug)]
pub enum Failure {
    /// The user pressed Ctrl+C
    Interrupted,
    /// A [`JamError`] was raised
    Controlled(FailureDetail),
    /// Any other error, or a panic
    Uncontrolled(FailureDetail),
}

impl Failure {
    /// Classify an [`anyhow::Error`], looking through it for a [`JamError`].
    ///
    /// The message keeps the whole context chain. A backtrace captured by
    /// anyhow is reused, otherwise one is captured here.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        let message = format!("{:#}", err);
        let trace = match err.backtrace().status() {
            std::backtrace::BacktraceStatus::Captured => err.backtrace().to_string(),
            _ => Backtrace::force_capture().to_string(),
        };

        match err.downcast_ref::<JamError>() {
            Some(jam) => Failure::Controlled(FailureDetail::new(jam.name(), message, trace)),
            None => Failure::Uncontrolled(FailureDetail::new("anyhow::Error", message, trace)),
        }
    }

    pub fn detail(&self) -> Option<&FailureDetail> {
        match self {
            Failure::Interrupted => None,
            Failure::Controlled(detail) | Failure::Uncontrolled(detail) => Some(detail),
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, Failure::Controlled(_))
    }
}

/// `?` on any error inside the scoped block lands here.
impl<E> From<E> for Failure
where
    E: StdError + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        let type_name = std::any::type_name::<E>();
        let boxed: Box<dyn StdError + Send + Sync> = Box::new(err);
        match boxed.downcast::<JamError>() {
            Ok(jam) => Failure::Controlled(FailureDetail::capture(jam.name(), jam.to_string())),
            Err(other) => Failure::Uncontrolled(FailureDetail::capture(type_name, other.to_string())),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Interrupted => write!(f, "interrupted"),
            Failure::Controlled(detail) | Failure::Uncontrolled(detail) => {
                write!(f, "{}: {}", detail.type_name, detail.message)
            }
        }
    }
}
