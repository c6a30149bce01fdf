//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Parse a format name from the config file
    pub fn from_config(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format an energy value
pub fn format_kwh(kwh: f64) -> String {
    format!("{:.2} kWh", kwh)
}

/// Print a severity banner in the color of its band
pub fn print_severity(severity: &str, headline: &str) {
    match severity {
        "high" => println!("{} {}", "✗".red().bold(), headline.red().bold()),
        "moderate" => print_warning(&headline.yellow().to_string()),
        _ => print_success(&headline.green().to_string()),
    }
}

/// Horizontal bar for a value, one block per half kWh
pub fn usage_bar(kwh: f64) -> String {
    let blocks = (kwh.max(0.0) * 2.0).round() as usize;
    "█".repeat(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_kwh() {
        assert_eq!(format_kwh(5.0), "5.00 kWh");
        assert_eq!(format_kwh(7.456), "7.46 kWh");
    }

    #[test]
    fn test_usage_bar() {
        assert_eq!(usage_bar(2.0).chars().count(), 4);
        assert_eq!(usage_bar(-1.0), "");
    }

    #[test]
    fn test_format_from_config() {
        assert_eq!(OutputFormat::from_config("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_config("TABLE"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_config("yaml"), None);
    }
}
