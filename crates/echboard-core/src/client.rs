//! Client for the scenario simulation API
//!
//! Endpoints: `GET /api/health`, `GET /api/scenarios[?category=]`,
//! `GET /api/scenarios/{id}`, `POST /api/simulate/{id}`, `GET /api/categories`,
//! `POST /api/compare`, `POST /api/sensitivity`, `GET /api/baseline`.

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use echboard_types::{
    BaselineData, CategoryCounts, ComparisonRequest, Scenario, ScenarioCatalog, ScenarioComparison,
    SensitivityAnalysis, SensitivityRequest, SimulationRequest, SimulationResult,
    MAX_COMPARED_SCENARIOS,
};

use crate::config::DashboardConfig;
use crate::error::CoreError;

/// Error body returned by the API (`{"error": "..."}`)
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// Extract the API's error message, falling back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::InvalidConfig {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, CoreError> {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_get<T: DeserializeOwned>(&self, url: String) -> Result<T, CoreError> {
        tracing::info!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| CoreError::Http {
                url: url.clone(),
                source,
            })?;
        decode(url, response).await
    }

    async fn send_post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T, CoreError> {
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| CoreError::Http {
                url: url.clone(),
                source,
            })?;
        decode(url, response).await
    }

    pub async fn health(&self) -> Result<serde_json::Value, CoreError> {
        self.send_get(self.url("/api/health")).await
    }

    /// All scenarios, optionally filtered by category
    pub async fn list_scenarios(&self, category: Option<&str>) -> Result<ScenarioCatalog, CoreError> {
        let base = self.url("/api/scenarios");
        let url = match category {
            Some(c) => Url::parse_with_params(&base, &[("category", c)])
                .map(|u| u.to_string())
                .map_err(|e| CoreError::InvalidConfig {
                    message: format!("Invalid API URL {}: {}", base, e),
                })?,
            None => base,
        };
        self.send_get(url).await
    }

    pub async fn scenario(&self, scenario_id: u32) -> Result<Scenario, CoreError> {
        let url = self.url(&format!("/api/scenarios/{}", scenario_id));
        self.send_get(url).await.map_err(|e| match e {
            CoreError::ApiStatus { status: 404, .. } => CoreError::ScenarioNotFound { scenario_id },
            other => other,
        })
    }

    pub async fn categories(&self) -> Result<CategoryCounts, CoreError> {
        self.send_get(self.url("/api/categories")).await
    }

    /// Run a simulation; overrides for parameters the scenario lacks are ignored server-side
    pub async fn simulate(
        &self,
        scenario_id: u32,
        overrides: BTreeMap<String, f64>,
    ) -> Result<SimulationResult, CoreError> {
        let url = self.url(&format!("/api/simulate/{}", scenario_id));
        let body = SimulationRequest::with_overrides(overrides);
        tracing::info!("POST {} ({} overrides)", url, body.custom_params.as_ref().map_or(0, |p| p.len()));

        self.send_post(url, &body).await.map_err(|e| match e {
            CoreError::ApiStatus { status: 404, .. } => CoreError::ScenarioNotFound { scenario_id },
            other => other,
        })
    }

    /// Simulate up to `MAX_COMPARED_SCENARIOS` scenarios side by side
    pub async fn compare(&self, scenario_ids: &[u32]) -> Result<ScenarioComparison, CoreError> {
        let body = comparison_request(scenario_ids)?;
        let url = self.url("/api/compare");
        tracing::info!("POST {} ({} scenarios)", url, body.scenario_ids.len());
        self.send_post(url, &body).await
    }

    /// Re-run a scenario once per value of `parameter`
    pub async fn sensitivity(
        &self,
        scenario_id: u32,
        parameter: &str,
        values: Vec<f64>,
    ) -> Result<SensitivityAnalysis, CoreError> {
        let body = sensitivity_request(scenario_id, parameter, values)?;
        let url = self.url("/api/sensitivity");
        tracing::info!("POST {} ({} = {} values)", url, body.parameter, body.values.len());
        self.send_post(url, &body).await
    }

    /// Historical dataset, including feedstock series
    pub async fn baseline(&self) -> Result<BaselineData, CoreError> {
        self.send_get(self.url("/api/baseline")).await
    }
}

/// Build a compare body, rejecting what the API would answer with 400
fn comparison_request(scenario_ids: &[u32]) -> Result<ComparisonRequest, CoreError> {
    let mut ids = Vec::with_capacity(scenario_ids.len());
    for &id in scenario_ids {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    if ids.is_empty() {
        return Err(CoreError::InvalidRequest {
            message: "at least one scenario id is required".to_string(),
        });
    }
    if ids.len() > MAX_COMPARED_SCENARIOS {
        return Err(CoreError::InvalidRequest {
            message: format!(
                "at most {} scenarios can be compared, got {}",
                MAX_COMPARED_SCENARIOS,
                ids.len()
            ),
        });
    }
    Ok(ComparisonRequest { scenario_ids: ids })
}

/// Build a sensitivity body; the API requires all three fields to be non-empty
fn sensitivity_request(
    scenario_id: u32,
    parameter: &str,
    values: Vec<f64>,
) -> Result<SensitivityRequest, CoreError> {
    let parameter = parameter.trim();
    if scenario_id == 0 || parameter.is_empty() || values.is_empty() {
        return Err(CoreError::InvalidRequest {
            message: "scenario_id, parameter, and values are required".to_string(),
        });
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(CoreError::InvalidRequest {
            message: format!("{} is not a finite value for {}", bad, parameter),
        });
    }
    Ok(SensitivityRequest {
        scenario_id,
        parameter: parameter.to_string(),
        values,
    })
}

async fn decode<T: DeserializeOwned>(url: String, response: Response) -> Result<T, CoreError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("{} returned {}", url, status);
        return Err(CoreError::ApiStatus {
            url,
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|source| CoreError::Decode { url, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_json_body() {
        assert_eq!(
            error_message(r#"{"error": "Scenario 99 not found"}"#),
            "Scenario 99 not found"
        );
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/api/health"), "http://localhost:5000/api/health");
    }

    #[test]
    fn test_comparison_request_dedups_and_caps() {
        let request = comparison_request(&[3, 1, 3, 6]).unwrap();
        assert_eq!(request.scenario_ids, vec![3, 1, 6]);

        // Duplicates do not count against the cap
        assert!(comparison_request(&[1, 2, 3, 4, 5, 5]).is_ok());

        let err = comparison_request(&[1, 2, 3, 4, 5, 6]).unwrap_err();
        assert!(err.to_string().contains("at most 5"));
        assert!(matches!(
            comparison_request(&[]),
            Err(CoreError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_sensitivity_request_requires_all_fields() {
        let request = sensitivity_request(5, " capacity_loss ", vec![0.1, 0.3]).unwrap();
        assert_eq!(request.parameter, "capacity_loss");
        assert_eq!(request.values, vec![0.1, 0.3]);

        assert!(sensitivity_request(0, "capacity_loss", vec![0.1]).is_err());
        assert!(sensitivity_request(5, "  ", vec![0.1]).is_err());
        assert!(sensitivity_request(5, "capacity_loss", vec![]).is_err());
        assert!(sensitivity_request(5, "capacity_loss", vec![f64::NAN]).is_err());
    }

    #[tokio::test]
    async fn test_invalid_comparison_fails_before_any_request() {
        // Unreachable server: a request attempt would surface as CoreError::Http
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = client.compare(&[1, 2, 3, 4, 5, 6]).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidRequest { .. }));

        let err = client.sensitivity(1, "demand_growth", vec![]).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_maps_to_http_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = client.categories().await.unwrap_err();
        assert!(matches!(err, CoreError::Http { .. }));
    }
}
