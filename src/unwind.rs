//! Panic capture for the scoped block
//!
//! A hook installed once per process records the message, location and
//! backtrace of a panic raised while [`catch`] is running on that thread.
//! Panics elsewhere go to whatever hook was installed before.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe, PanicHookInfo};
use std::sync::Once;

use crate::errors::FailureDetail;

/// Type name reported for panics
pub const PANIC_TYPE: &str = "panic";

static INSTALL: Once = Once::new();

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    static CAPTURED: RefCell<Option<FailureDetail>> = const { RefCell::new(None) };
}

fn install_hook() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
            if DEPTH.with(Cell::get) == 0 {
                previous(info);
                return;
            }

            let location = info
                .location()
                .map(|l| format!("panicked at {}:{}:{}\n", l.file(), l.line(), l.column()))
                .unwrap_or_default();
            let trace = format!("{}{}", location, Backtrace::force_capture());
            let detail = FailureDetail::new(PANIC_TYPE, payload_message(info.payload()), trace);
            CAPTURED.with(|slot| *slot.borrow_mut() = Some(detail));
        }));
    });
}

/// Run `f`, turning a panic into its [`FailureDetail`]
pub fn catch<R>(f: impl FnOnce() -> R) -> Result<R, FailureDetail> {
    install_hook();

    DEPTH.with(|d| d.set(d.get() + 1));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    DEPTH.with(|d| d.set(d.get() - 1));

    result.map_err(|payload| {
        CAPTURED
            .with(|slot| slot.borrow_mut().take())
            .unwrap_or_else(|| FailureDetail::new(PANIC_TYPE, payload_message(&*payload), String::new()))
    })
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::new()
    }
}
