//! API client for a remote tco-server

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tco_lib::{CostAnalysis, OptimizationRecommendation, PlacementComparison, TelcoDeployment};
use tracing::debug;
use url::Url;

/// API client for the TCO server
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

/// Error body returned by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
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

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;
        debug!(url = %url, "POST");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|err| err.error)
                .unwrap_or(body);
            anyhow::bail!("API error ({}): {}", status, message);
        }

        response.json().await.context("Failed to parse response")
    }

    pub async fn analyze(&self, deployment: &TelcoDeployment) -> Result<CostAnalysis> {
        self.post("api/v1/analyze", deployment).await
    }

    pub async fn optimize(
        &self,
        deployment: &TelcoDeployment,
    ) -> Result<Vec<OptimizationRecommendation>> {
        self.post("api/v1/optimize", deployment).await
    }

    pub async fn compare(&self, deployment: &TelcoDeployment) -> Result<PlacementComparison> {
        self.post("api/v1/compare", deployment).await
    }
}
