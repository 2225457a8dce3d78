//! Failure report written to the warnings channel

use crate::errors::FailureDetail;

pub const SEPARATOR_WIDTH: usize = 80;

/// Header, type, message and stack trace between separator lines
pub fn warning_block(header: &str, detail: &FailureDetail) -> String {
    let heavy = "=".repeat(SEPARATOR_WIDTH);
    let light = "_".repeat(SEPARATOR_WIDTH);

    let mut msg = format!("{}\n\n", header);
    msg.push_str(&heavy);
    msg.push('\n');
    msg.push_str(&format!("EXCEPTION: {}\n", detail.type_name));
    msg.push_str(&format!("  MESSAGE: {}\n", detail.message));
    msg.push_str(&light);
    msg.push_str("\n\n");
    msg.push_str(&detail.trace);
    if !detail.trace.ends_with('\n') {
        msg.push('\n');
    }
    msg.push_str(&heavy);
    msg
}
