//! Terminal output helpers for command summaries.

use owo_colors::OwoColorize;

/// Outcome markers used in summaries.
#[derive(Debug, Clone, Copy)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

impl Status {
    fn marker(&self) -> String {
        match self {
            Status::Success => "✓".green().to_string(),
            Status::Error => "✗".red().to_string(),
            Status::Warning => "⚠".yellow().to_string(),
            Status::Info => "→".cyan().to_string(),
        }
    }

    fn paint(&self, text: &str) -> String {
        match self {
            Status::Success => text.green().bold().to_string(),
            Status::Error => text.red().bold().to_string(),
            Status::Warning => text.yellow().bold().to_string(),
            Status::Info => text.cyan().to_string(),
        }
    }

    pub fn print(&self, message: &str) {
        let line = format!("  {} {}", self.marker(), self.paint(message));
        match self {
            Status::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}

pub fn print_success(message: &str) {
    Status::Success.print(message);
}

pub fn print_warning(message: &str) {
    Status::Warning.print(message);
}

pub fn print_error(message: &str) {
    Status::Error.print(message);
}

pub fn print_info(message: &str) {
    Status::Info.print(message);
}

/// Bold cyan heading followed by a blank line.
pub fn print_section_header(title: &str) {
    println!("{}", title.cyan().bold());
    println!();
}

pub fn print_key_value(key: &str, value: &str) {
    println!("  {} {}", key.bright_black().bold(), value.bold().white());
}

pub fn print_summary_box(title: &str, items: &[(&str, &str)]) {
    println!("┌─ {} {}", title.cyan().bold(), "─".repeat(50).bright_black());
    for (key, value) in items {
        println!("│ {} {}", key.bright_black().bold(), value.bold().white());
    }
    println!("└{}", "─".repeat(60).bright_black());
}

/// Formats a duration in seconds as `850ms`, `2.31s` or `1m 4.2s`.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.2}s", seconds)
    } else {
        format!("{}m {:.1}s", (seconds / 60.0) as u64, seconds % 60.0)
    }
}
