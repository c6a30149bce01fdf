//! Evaluate a household reading against the prediction service

use crate::client::{ApiClient, EvaluationRequest, EvaluationResponse};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use colored::Colorize;

/// Shown when no recommendation rule fires
///
/// The CLI only speaks HTTP to the service and does not link the core crate;
/// a test pins this to `energy_lib::OPTIMIZED_MESSAGE`.
pub const OPTIMIZED_MESSAGE: &str = "Your current settings are optimized for energy efficiency!";

/// Submit a reading and render the prediction, severity and recommendations
pub async fn evaluate(
    client: &ApiClient,
    request: EvaluationRequest,
    format: OutputFormat,
) -> Result<()> {
    let response: EvaluationResponse = client.post("api/v1/evaluate", &request).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Table => render(&response),
    }

    Ok(())
}

fn render(response: &EvaluationResponse) {
    println!("{}", "Energy Consumption Prediction".bold());
    println!();
    println!(
        "  Predicted Energy Consumption: {}",
        output::format_kwh(response.prediction_kwh).bold()
    );
    println!();
    output::print_severity(&response.severity, &response.headline);
    println!("  {}", response.advice);
    println!();

    println!("{}", "Optimization Recommendations".bold());
    if response.recommendations.is_empty() {
        output::print_success(OPTIMIZED_MESSAGE);
    } else {
        for recommendation in &response.recommendations {
            output::print_info(&recommendation.message);
        }
    }
}
