//! CLI output formatting module
//!
//! Commands build an output value implementing [`CommandOutput`] and hand it
//! to [`output`], which prints either the human rendering or pretty JSON.

pub mod progress;
pub mod summary;
pub mod table;

use serde::Serialize;

pub use progress::create_spinner;
pub use table::TableFormatter;

/// A command result that can be rendered for humans or machines.
pub trait CommandOutput: Serialize {
    /// Terminal rendering.
    fn to_human(&self) -> String;

    /// Machine rendering.
    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Print a command result to stdout.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
        );
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to a maximum number of characters, appending "..." if
/// truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Format a byte count with a binary unit suffix.
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Format a signed score delta (`+1.50`, `-2.00`, `0.00`).
pub fn format_delta(delta: f64) -> String {
    if delta > 0.0 {
        format!("+{delta:.2}")
    } else {
        format!("{delta:.2}")
    }
}
