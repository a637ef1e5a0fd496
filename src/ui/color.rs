//! Color and formatting utilities for terminal output

use crate::core::types::ProbeStatus;

pub struct Colors;

impl Colors {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";

    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const YELLOW: &'static str = "\x1b[33m";
    pub const CYAN: &'static str = "\x1b[36m";

    pub const BRIGHT_RED: &'static str = "\x1b[91m";
    pub const BRIGHT_GREEN: &'static str = "\x1b[92m";
}

/// Apply color to text if terminal supports it
pub fn colorize(text: &str, color: &str) -> String {
    if supports_formatting() {
        format!("{}{}{}", color, text, Colors::RESET)
    } else {
        text.to_string()
    }
}

/// Terminal capability detection
pub fn supports_formatting() -> bool {
    use std::env;
    use std::io::IsTerminal;

    if env::var("NO_COLOR").is_ok() || env::var("FORCE_COLOR").as_deref() == Ok("0") {
        return false;
    }

    if env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    // Keep assertions on rendered text stable
    if cfg!(test) {
        return false;
    }

    if !std::io::stdout().is_terminal() {
        return false;
    }

    match env::var("TERM") {
        Ok(term) => !(term == "dumb" || term.is_empty()),
        Err(_) => env::var("TERM_PROGRAM").is_ok(),
    }
}

/// Color used for a probe status in the terminal summary.
pub fn status_color(status: ProbeStatus) -> &'static str {
    match status.code() {
        Some(200..=299) => Colors::GREEN,
        Some(300..=399) => Colors::CYAN,
        Some(400..=499) => Colors::YELLOW,
        Some(_) => Colors::RED,
        None => Colors::BRIGHT_RED,
    }
}

pub fn paint_status(status: ProbeStatus) -> String {
    colorize(&status.to_string(), status_color(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_is_plain_under_test() {
        assert_eq!(colorize("test", Colors::RED), "test");
    }

    #[test]
    fn test_status_color() {
        assert_eq!(status_color(ProbeStatus::Code(200)), Colors::GREEN);
        assert_eq!(status_color(ProbeStatus::Code(301)), Colors::CYAN);
        assert_eq!(status_color(ProbeStatus::Code(404)), Colors::YELLOW);
        assert_eq!(status_color(ProbeStatus::Code(503)), Colors::RED);
        assert_eq!(status_color(ProbeStatus::Error), Colors::BRIGHT_RED);
    }

    #[test]
    fn test_paint_status_text() {
        assert_eq!(paint_status(ProbeStatus::Code(503)), "503");
        assert_eq!(paint_status(ProbeStatus::Error), "Error");
    }
}
