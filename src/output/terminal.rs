pub mod colors {
    pub const RED: u8 = 167;       // #E34F45 - Errors
    pub const BLUE: u8 = 68;       // #426BD1 - Banners, names
}

/// ANSI escape code constants
pub const RESET: &str = "\x1b[0m";

/// Generate foreground color escape code
#[inline]
pub fn fg(color: u8) -> String {
    format!("\x1b[38;5;{}m", color)
}

/// Colorize text with a foreground color
#[inline]
pub fn colorize(text: &str, color: u8) -> String {
    format!("{}{}{}", fg(color), text, RESET)
}

/// Colorize only when `enabled`, otherwise hand the text back untouched
#[inline]
pub fn paint(text: &str, color: u8, enabled: bool) -> String {
    if enabled {
        colorize(text, color)
    } else {
        text.to_string()
    }
}

/// Program banner (blue)
#[inline]
pub fn banner(text: &str, enabled: bool) -> String {
    paint(text, colors::BLUE, enabled)
}

/// Error message (red)
#[inline]
pub fn error(text: &str, enabled: bool) -> String {
    paint(text, colors::RED, enabled)
}
