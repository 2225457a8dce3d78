//! Output handling (terminal colours)

pub mod terminal;

pub use terminal::{banner, colors, colorize, error, fg, paint, RESET};
