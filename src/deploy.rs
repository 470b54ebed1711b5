//! The deploy phase: upload the function source to the first candidate
//! endpoint that accepts it.
//!
//! Builds the JSON payload once, then walks the ordered candidate list issuing
//! an HTTP PUT per candidate. Transport errors are tolerated per candidate; any
//! response with a status below 400 ends the walk as a success. Progress is
//! printed to stdout so the operator can see exactly what each API returned.

use crate::config::{DeployConfig, DEPLOY_TIMEOUT_SECS, USER_AGENT};
use crate::error::FatalError;
use serde::Serialize;
use std::time::Duration;

/// Payload uploaded to the functions API. Constructed once per run.
#[derive(Debug, Serialize)]
pub struct DeploymentRequest {
    pub slug: String,
    pub body: String,
    pub verify_jwt: bool,
}

/// Read the bearer credential from the configured environment variable.
///
/// Fails fast: the deploy loop must not start without a credential.
pub fn resolve_token(var: &str) -> Result<String, FatalError> {
    match std::env::var(var) {
        Ok(token) if !token.is_empty() => Ok(token),
        _ => Err(FatalError::Credential {
            var: var.to_string(),
        }),
    }
}

/// Read the function source text from the configured artifact path.
pub fn load_artifact(path: &str) -> Result<String, FatalError> {
    std::fs::read_to_string(path).map_err(|source| FatalError::Artifact {
        path: path.to_string(),
        source,
    })
}

/// Owns the HTTP client, the resolved credential, and the payload for one
/// deployment run.
pub struct Deployer {
    client: reqwest::Client,
    token: String,
    endpoints: Vec<String>,
    payload: DeploymentRequest,
}

impl Deployer {
    pub fn new(config: &DeployConfig, token: String, body: String) -> Result<Self, FatalError> {
        // Redirects are not followed: the raw status decides success, and a
        // 3xx counts as accepted.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(DEPLOY_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            token,
            endpoints: config.endpoints.clone(),
            payload: DeploymentRequest {
                slug: config.slug.clone(),
                body,
                verify_jwt: config.verify_jwt,
            },
        })
    }

    /// Try each candidate endpoint in order; stop at the first success.
    ///
    /// Returns true when some candidate answered with a status below 400.
    /// Transport failures count against the current candidate only.
    pub async fn run(&self) -> bool {
        for endpoint in &self.endpoints {
            let url = target_url(endpoint, &self.payload.slug);
            println!("Trying {}...", url);

            match self.attempt(&url).await {
                Ok((status, text)) => {
                    println!("Status: {}", status.as_u16());
                    println!("Response: {}", text);
                    if status.as_u16() < 400 {
                        println!("✅ Deployment successful!");
                        tracing::info!(url = %url, status = status.as_u16(), "Deployment accepted");
                        return true;
                    }
                    tracing::warn!(
                        url = %url,
                        status = status.as_u16(),
                        "Candidate rejected the upload"
                    );
                }
                Err(e) => {
                    println!("❌ Error: {}", e);
                    tracing::warn!(url = %url, error = %e, "Candidate unreachable");
                }
            }
        }

        false
    }

    async fn attempt(&self, url: &str) -> Result<(reqwest::StatusCode, String), reqwest::Error> {
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .json(&self.payload)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }
}

/// Join a candidate base URL with the function slug as the final path segment.
fn target_url(base: &str, slug: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), slug)
}
