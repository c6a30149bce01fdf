//! Display the simulated 24-hour usage profile

use crate::client::{ApiClient, HourlyUsage};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct UsageRow {
    #[tabled(rename = "Hour")]
    hour: String,
    #[tabled(rename = "Usage")]
    usage: String,
    #[tabled(rename = "")]
    bar: String,
}

impl From<&HourlyUsage> for UsageRow {
    fn from(point: &HourlyUsage) -> Self {
        Self {
            hour: format!("{:02}:00", point.hour),
            usage: output::format_kwh(point.usage_kwh),
            bar: output::usage_bar(point.usage_kwh),
        }
    }
}

/// Fetch and render the daily usage pattern
pub async fn show_pattern(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let pattern: Vec<HourlyUsage> = client.get("api/v1/usage-pattern").await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&pattern)?);
        }
        OutputFormat::Table => {
            if pattern.is_empty() {
                output::print_warning("No usage data returned");
                return Ok(());
            }

            println!("{}", "Daily Energy Usage Pattern".bold());
            println!();

            let rows: Vec<UsageRow> = pattern.iter().map(UsageRow::from).collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);

            let total: f64 = pattern.iter().map(|p| p.usage_kwh).sum();
            println!();
            println!("  Total: {}", output::format_kwh(total).bold());
        }
    }

    Ok(())
}
