//! Fallback verification: probe the already-deployed function.
//!
//! When no candidate endpoint accepts the upload, the live function is asked
//! (unauthenticated) what it is currently running. The response is diagnostic
//! only; nothing here is allowed to abort the process.

use crate::config::{HEALTH_QUERY, HEALTH_TIMEOUT_SECS, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;

/// Metadata reported by the live function's health endpoint.
///
/// Both fields are optional in the wire format; absent keys parse to the
/// defaults. Feature tags are opaque JSON values, not necessarily strings.
#[derive(Debug, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub features: Vec<serde_json::Value>,
}

impl HealthReport {
    /// The reported version, or "unknown" when the endpoint omitted it.
    pub fn version_label(&self) -> &str {
        self.version.as_deref().unwrap_or("unknown")
    }

    /// Whether any feature tag mentions tenant or fallback handling.
    ///
    /// Tags are stringified before matching since the endpoint may emit
    /// non-string values.
    pub fn has_tenant_fallback(&self) -> bool {
        self.features.iter().any(|f| {
            let tag = match f.as_str() {
                Some(s) => s.to_lowercase(),
                None => f.to_string().to_lowercase(),
            };
            tag.contains("tenant") || tag.contains("fallback")
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Health request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Health response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Issue the unauthenticated health GET and decode the JSON body.
pub async fn probe(client: &reqwest::Client, url: &str) -> Result<HealthReport, ProbeError> {
    let separator = if url.contains('?') { '&' } else { '?' };
    let probe_url = format!("{}{}{}", url, separator, HEALTH_QUERY);

    let text = client.get(&probe_url).send().await?.text().await?;
    let report: HealthReport = serde_json::from_str(&text)?;
    Ok(report)
}

/// Probe the live function and print what it is running.
///
/// Every failure is caught and printed; this diagnostic must never change the
/// outcome of the run.
pub async fn report_current(url: &str) {
    println!("\n🔍 Testing current deployed function...");

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            println!("Health check failed: {}", e);
            tracing::warn!(error = %e, "Could not build health-probe client");
            return;
        }
    };

    match probe(&client, url).await {
        Ok(report) => {
            println!("Current version: {}", report.version_label());
            println!("Has tenant fallback logic: {}", report.has_tenant_fallback());
            tracing::info!(
                version = report.version_label(),
                features = report.features.len(),
                "Health probe succeeded"
            );
        }
        Err(e) => {
            println!("Health check failed: {}", e);
            tracing::warn!(url = %url, error = %e, "Health probe failed");
        }
    }
}
