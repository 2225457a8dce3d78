//! Exit status codes for programs run under the guard
//!
//! - 0: Success (including a version query)
//! - 1: Any handled failure (no arguments, interrupt, controlled or unexpected error)
//! - 2: The argument grammar rejected the command line

use std::process::{ExitCode, Termination};

/// Exit status codes returned by [`crate::core::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// Caller logic completed, or the version banner was requested
    Success = 0,
    /// Missing arguments, user interrupt, or a caught failure
    Error = 1,
    /// Argument validation failed in the parser
    Usage = 2,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

/// Caller logic that returns nothing finished successfully.
impl From<()> for ExitStatus {
    fn from(_: ()) -> Self {
        ExitStatus::Success
    }
}

impl ExitStatus {
    /// Raw process exit code
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Create an exit status from a raw exit code
    ///
    /// Unknown non-zero codes collapse to `Error`.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ExitStatus::Success,
            2 => ExitStatus::Usage,
            _ => ExitStatus::Error,
        }
    }

    pub fn is_success(self) -> bool {
        self == ExitStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::Error.code(), 1);
        assert_eq!(ExitStatus::Usage.code(), 2);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(ExitStatus::from_code(0), ExitStatus::Success);
        assert_eq!(ExitStatus::from_code(2), ExitStatus::Usage);
        assert_eq!(ExitStatus::from_code(130), ExitStatus::Error);
        assert_eq!(ExitStatus::from_code(-1), ExitStatus::Error);
    }

    #[test]
    fn test_unit_is_success() {
        let status: ExitStatus = ().into();
        assert!(status.is_success());
    }
}
