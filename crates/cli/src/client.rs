//! API client for communicating with the Energy Optimizer service

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

/// API client for the optimizer service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            // Prefer the service's own error message when it sent one
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            anyhow::bail!("API error ({}): {}", status, message);
        }

        response.json().await.context("Failed to parse response")
    }
}

// API request/response types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub temperature: f64,
    pub humidity: f64,
    pub time_of_day: String,
    pub day_of_week: String,
    pub occupancy: i64,
    pub appliance_usage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub rule: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub features: Vec<f64>,
    pub prediction_kwh: f64,
    pub severity: String,
    pub headline: String,
    pub advice: String,
    pub recommendations: Vec<RecommendationItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyUsage {
    pub hour: u32,
    pub usage_kwh: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_path: String,
    pub scaler_path: String,
    pub model_format: String,
    pub model_sha256: String,
    pub scaler_sha256: String,
    pub n_features: usize,
    pub feature_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EvaluationRequest {
        EvaluationRequest {
            temperature: 22.0,
            humidity: 50.0,
            time_of_day: "12:00".to_string(),
            day_of_week: "Monday".to_string(),
            occupancy: 2,
            appliance_usage: 5.0,
        }
    }

    #[tokio::test]
    async fn test_post_evaluation() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/evaluate")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "features": [22.0, 50.0, 12.0, 0.0, 2.0, 5.0],
                    "prediction_kwh": 5.2,
                    "severity": "moderate",
                    "headline": "Moderate Energy Usage",
                    "advice": "Your energy usage is within normal range.",
                    "recommendations": []
                }"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let response: EvaluationResponse = client
            .post("api/v1/evaluate", &request())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.severity, "moderate");
        assert_eq!(response.features.len(), 6);
        assert!(response.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_message_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/evaluate")
            .with_status(422)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "unknown day of week 'Caturday'", "code": "invalid_input"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client
            .post::<EvaluationResponse, _>("api/v1/evaluate", &request())
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("422"), "{}", message);
        assert!(message.contains("Caturday"), "{}", message);
    }

    #[tokio::test]
    async fn test_get_usage_pattern() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/usage-pattern")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"hour": 0, "usage_kwh": 5.1}, {"hour": 1, "usage_kwh": 5.9}]"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let pattern: Vec<HourlyUsage> = client.get("api/v1/usage-pattern").await.unwrap();

        assert_eq!(pattern.len(), 2);
        assert_eq!(pattern[1].hour, 1);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
