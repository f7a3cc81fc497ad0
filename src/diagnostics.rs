use crate::config::Config;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Success,
    Error,
}

/// Outcome of one backend probe
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub endpoint: String,
    pub url: String,
    pub status: ProbeStatus,
    pub status_code: Option<u16>,
    pub message: String,
    pub elapsed_ms: Option<u128>,
    pub body: Option<Value>,
    pub checked_at: DateTime<Utc>,
}

/// Endpoints checked by [`diagnose`], in order
pub fn probe_targets(config: &Config) -> Vec<(&'static str, String)> {
    vec![
        ("Health Check", format!("{}/health", config.base_url)),
        ("Properties (no filters)", config.properties_url()),
        ("Properties (name filter)", format!("{}?name=test", config.properties_url())),
        ("API Root", format!("{}/api", config.base_url)),
        ("Swagger Documentation", format!("{}/swagger", config.base_url)),
    ]
}

/// Probe the backend's well-known endpoints one after another
pub async fn diagnose(config: &Config) -> Result<Vec<ProbeResult>> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().context("Failed to create HTTP client")?;

    info!("Running API diagnostic against {}", config.base_url);
    let mut results = Vec::new();
    for (endpoint, url) in probe_targets(config) {
        results.push(probe(&client, endpoint, &url).await);
    }
    Ok(results)
}

async fn probe(client: &Client, endpoint: &str, url: &str) -> ProbeResult {
    let started = Instant::now();
    let response = client.get(url).header(ACCEPT, "application/json").send().await;

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            warn!("{} unreachable: {}", endpoint, e);
            return ProbeResult {
                endpoint: endpoint.to_string(),
                url: url.to_string(),
                status: ProbeStatus::Error,
                status_code: None,
                message: e.to_string(),
                elapsed_ms: None,
                body: None,
                checked_at: Utc::now(),
            };
        }
    };

    let elapsed_ms = started.elapsed().as_millis();
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false);

    let body = match response.text().await {
        Ok(text) if is_json => serde_json::from_str(&text)
            .unwrap_or_else(|_| Value::String("Could not parse response".to_string())),
        Ok(text) => Value::String(text),
        Err(_) => Value::String("Could not parse response".to_string()),
    };

    ProbeResult {
        endpoint: endpoint.to_string(),
        url: url.to_string(),
        status: if status.is_success() {
            ProbeStatus::Success
        } else {
            ProbeStatus::Error
        },
        status_code: Some(status.as_u16()),
        message: format!(
            "{} {} ({}ms)",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            elapsed_ms
        ),
        elapsed_ms: Some(elapsed_ms),
        body: Some(body),
        checked_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_targets() {
        let config = Config::default();
        let urls: Vec<String> = probe_targets(&config).into_iter().map(|(_, url)| url).collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:5179/health",
                "http://localhost:5179/api/properties",
                "http://localhost:5179/api/properties?name=test",
                "http://localhost:5179/api",
                "http://localhost:5179/swagger",
            ]
        );
    }
}
