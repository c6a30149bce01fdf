//! Display metadata about the loaded model artifacts

use crate::client::{ApiClient, ModelInfo};
use crate::output::OutputFormat;
use anyhow::Result;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct FeatureRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Feature")]
    name: String,
}

/// Fetch and render model metadata
pub async fn show_model(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let info: ModelInfo = client.get("api/v1/model").await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Table => {
            println!("{}", "Model Artifacts".bold());
            println!();
            println!("  Format:         {}", info.model_format.cyan());
            println!("  Model:          {}", info.model_path);
            println!("  Model SHA256:   {}", short_digest(&info.model_sha256).dimmed());
            println!("  Scaler:         {}", info.scaler_path);
            println!("  Scaler SHA256:  {}", short_digest(&info.scaler_sha256).dimmed());
            println!();

            let rows: Vec<FeatureRow> = info
                .feature_names
                .iter()
                .enumerate()
                .map(|(index, name)| FeatureRow {
                    index,
                    name: name.clone(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
    }

    Ok(())
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}
