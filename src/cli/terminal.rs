//! Terminal capability detection and styling

use owo_colors::{OwoColorize, colors::css};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// A horizontal rule fitting the terminal, at most `max` columns wide.
pub fn rule(max: usize) -> String {
    let width = terminal_width().map_or(max, |w| usize::from(w).min(max));
    "─".repeat(width)
}

fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(text)
    } else {
        text.to_string()
    }
}

/// Extension trait for styling output
pub trait Colorize: AsRef<str> {
    /// Section and level headings (bold)
    fn heading(&self) -> String {
        paint(self.as_ref(), |s| s.bold().to_string())
    }

    /// Identifiers and keys (blue)
    fn accent(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::LightBlue>().to_string())
    }

    /// Good news (green)
    fn success(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::Green>().to_string())
    }

    /// Data-quality problems (amber)
    fn warning(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::Orange>().to_string())
    }

    /// Secondary text
    fn dim(&self) -> String {
        paint(self.as_ref(), |s| s.dimmed().to_string())
    }
}

impl<T: AsRef<str> + ?Sized> Colorize for T {}
