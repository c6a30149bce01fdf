//! Smart Home Energy Optimizer CLI
//!
//! A command-line tool for evaluating household readings, viewing the
//! daily usage pattern and inspecting the loaded model.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{evaluate, model, pattern};

/// Smart Home Energy Optimizer CLI
#[derive(Parser)]
#[command(name = "eopt")]
#[command(author, version, about = "CLI for the Smart Home Energy Optimizer", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via EOPT_API_URL env var)
    #[arg(long, env = "EOPT_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict energy consumption for a reading and get recommendations
    Evaluate {
        /// Indoor temperature in °C (10-35)
        #[arg(long, default_value_t = 22.0)]
        temperature: f64,

        /// Relative humidity in % (30-80)
        #[arg(long, default_value_t = 50.0)]
        humidity: f64,

        /// Time of day as HH:MM
        #[arg(long, default_value = "12:00")]
        time: String,

        /// Day of week (Monday..Sunday)
        #[arg(long, default_value = "Monday")]
        day: String,

        /// Number of occupants (0-10)
        #[arg(long, default_value_t = 2)]
        occupancy: i64,

        /// Appliance usage level (0-10)
        #[arg(long, default_value_t = 5.0)]
        appliance_usage: f64,
    },

    /// Show the simulated 24-hour usage pattern
    Pattern,

    /// Show metadata about the loaded model
    Model,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::Config::load()?;
    let format = cli
        .format
        .or_else(|| config.default_format.as_deref().and_then(output::OutputFormat::from_config))
        .unwrap_or_default();

    let client = client::ApiClient::new(&config.api_url(cli.api_url))?;

    match cli.command {
        Commands::Evaluate {
            temperature,
            humidity,
            time,
            day,
            occupancy,
            appliance_usage,
        } => {
            let request = client::EvaluationRequest {
                temperature,
                humidity,
                time_of_day: time,
                day_of_week: day,
                occupancy,
                appliance_usage,
            };
            evaluate::evaluate(&client, request, format).await?;
        }
        Commands::Pattern => {
            pattern::show_pattern(&client, format).await?;
        }
        Commands::Model => {
            model::show_model(&client, format).await?;
        }
    }

    Ok(())
}
