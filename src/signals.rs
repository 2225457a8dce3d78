//! Interrupt/signal handling for controlled shutdown
//!
//! Ctrl+C raises a shared flag instead of killing the process. Caller logic
//! polls it with [`Interrupt::check`] and the run guard inspects it once the
//! scoped block returns. A second Ctrl+C exits at once, after writing the
//! interrupt line through the log the guard attached to the flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::Dispatch;

use crate::core::INTERRUPT_MESSAGE;
use crate::errors::Failure;
use crate::logging::DEFAULT_TARGET;
use crate::status::ExitStatus;

/// Process-wide handle raised by the Ctrl+C handler
static GLOBAL: OnceLock<Interrupt> = OnceLock::new();

/// A cloneable interrupt flag
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
    log: Arc<Mutex<Option<Dispatch>>>,
}

impl Interrupt {
    /// Create a private flag, not wired to any signal handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the flag was raised
    #[inline]
    pub fn was_interrupted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Raise the flag (called from the signal handler)
    #[inline]
    pub fn set_interrupted(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Lower the flag
    #[inline]
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// Log to `dispatch` if the process is forced to exit
    pub fn attach_log(&self, dispatch: Dispatch) {
        if let Ok(mut log) = self.log.lock() {
            *log = Some(dispatch);
        }
    }

    pub fn detach_log(&self) {
        if let Ok(mut log) = self.log.lock() {
            *log = None;
        }
    }

    /// Write the interrupt line to the attached log, if any.
    ///
    /// Works from any thread, including the signal handler's.
    pub fn log_forced_exit(&self) {
        let Ok(log) = self.log.lock() else {
            return;
        };
        if let Some(dispatch) = log.as_ref() {
            tracing::dispatcher::with_default(dispatch, || {
                tracing::error!(target: DEFAULT_TARGET, "{}", INTERRUPT_MESSAGE);
            });
        }
    }

    /// Log the interrupt line and terminate with [`ExitStatus::Error`]
    pub fn force_exit(&self) -> ! {
        self.log_forced_exit();
        std::process::exit(ExitStatus::Error.code())
    }

    /// Bail out of caller logic with [`Failure::Interrupted`] once the flag is raised.
    pub fn check(&self) -> Result<(), Failure> {
        if self.was_interrupted() {
            Err(Failure::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// The handle shared with the Ctrl+C handler
pub fn global() -> &'static Interrupt {
    GLOBAL.get_or_init(Interrupt::new)
}

/// Install the Ctrl+C handler on the global handle.
///
/// The first Ctrl+C raises the flag; a second one exits immediately.
pub fn install_handler() -> Result<(), ctrlc::Error> {
    let interrupt = global().clone();
    ctrlc::set_handler(move || {
        if interrupt.was_interrupted() {
            interrupt.force_exit();
        }
        interrupt.set_interrupted();
        eprintln!("\nInterrupted");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogConfig, Logger};
    use std::{fs, thread};
    use tempfile::TempDir;

    #[test]
    fn test_interrupt_flag() {
        let interrupt = Interrupt::new();
        assert!(!interrupt.was_interrupted());

        interrupt.set_interrupted();
        assert!(interrupt.was_interrupted());

        interrupt.reset();
        assert!(!interrupt.was_interrupted());
    }

    #[test]
    fn test_clones_share_state() {
        let interrupt = Interrupt::new();
        let other = interrupt.clone();
        other.set_interrupted();
        assert!(interrupt.was_interrupted());
    }

    #[test]
    fn test_check() {
        let interrupt = Interrupt::new();
        assert!(interrupt.check().is_ok());

        interrupt.set_interrupted();
        assert!(matches!(interrupt.check(), Err(Failure::Interrupted)));
    }

    #[test]
    fn test_forced_exit_logs_from_another_thread() {
        let dir = TempDir::new().unwrap();
        let config = LogConfig::new("demo", "1").out_dir(Some(dir.path().to_path_buf()));
        let logger = Logger::init(&config).unwrap();

        let interrupt = Interrupt::new();
        interrupt.log_forced_exit();
        interrupt.attach_log(logger.dispatch().clone());

        let handle = interrupt.clone();
        thread::spawn(move || handle.log_forced_exit()).join().unwrap();

        interrupt.detach_log();
        interrupt.log_forced_exit();

        let log = fs::read_to_string(logger.log_path()).unwrap();
        assert_eq!(log.matches(INTERRUPT_MESSAGE).count(), 1);
    }

    #[test]
    fn test_private_flags_are_independent() {
        let a = Interrupt::new();
        let b = Interrupt::new();
        a.set_interrupted();
        assert!(!b.was_interrupted());
    }
}
