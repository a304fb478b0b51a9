//! Utility functions for the CICN CLI

use anyhow::{Context, Result};
use log::info;
use std::time::{Duration, Instant};

/// Format a duration as a human-readable string, down to microseconds
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();

    if duration < Duration::from_millis(1) {
        format!("{}µs", duration.as_micros())
    } else if total_secs == 0 {
        format!("{:.3}ms", duration.as_secs_f64() * 1000.0)
    } else if total_secs < 60 {
        format!("{}.{:03}s", total_secs, duration.subsec_millis())
    } else {
        format!("{}m {}s", total_secs / 60, total_secs % 60)
    }
}

/// Format a byte count using binary units
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Parse hex input, tolerating whitespace and a leading `0x`.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
        .unwrap_or(&cleaned);
    hex::decode(digits).context("Input is not valid hex")
}

/// Simple timer for measuring operations
pub struct Timer {
    start: Instant,
    operation: String,
}

impl Timer {
    /// Create a new timer for the specified operation
    pub fn new(operation: &str) -> Self {
        info!("Starting operation: {}", operation);
        Self {
            start: Instant::now(),
            operation: operation.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!(
            "Operation '{}' completed in {}",
            self.operation,
            format_duration(self.elapsed())
        );
    }
}

/// Print a section header in the CLI output
pub fn print_header(title: &str) {
    println!("\n{}", title);
    println!("{}", "=".repeat(title.len()));
}
