//! Execution context

pub mod environment;

pub use environment::{color_enabled, Environment, COLOR_ENV, LOG_ENV};
