//! Configuration loading and constants.
//!
//! Loads the deployment configuration from a TOML file and defines constants for
//! HTTP timeouts, default paths, and logging. `AppConfig` is the root configuration
//! struct containing the deploy target description and the health-probe endpoint.

use const_format::formatcp;
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// HTTP Timeouts
// =============================================================================

/// Per-attempt timeout for deployment PUT requests, in seconds.
/// Function bodies can be large and the API may compile on upload, so this is
/// deliberately generous.
pub const DEPLOY_TIMEOUT_SECS: u64 = 30;

/// Timeout for the fallback health probe, in seconds. The probe is a small
/// unauthenticated GET against an already-running function and should be quick.
pub const HEALTH_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Defaults and identification
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "quickdeploy.toml";

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "quickdeploy=info";

/// Default environment variable holding the bearer credential
pub const DEFAULT_TOKEN_ENV: &str = "SERVICE_ROLE_KEY";

/// Query parameter appended to the health URL to signal a health probe
pub const HEALTH_QUERY: &str = "health=1";

/// User-Agent header sent on every request (compile-time string concatenation)
pub const USER_AGENT: &str = formatcp!("quickdeploy/{}", env!("CARGO_PKG_VERSION"));

/// Root configuration struct loaded from the TOML config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub deploy: DeployConfig,
    pub health: HealthConfig,
}

/// Describes the function to upload and where to upload it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Identifier of the deployed function this upload replaces
    pub slug: String,

    /// Path to the local file containing the function source text
    pub artifact: String,

    /// Whether the platform should verify JWTs on invocation
    #[serde(default)]
    pub verify_jwt: bool,

    /// Candidate API base URLs, tried in listed order until one accepts the
    /// upload. The slug is appended as the final path segment.
    pub endpoints: Vec<String>,

    /// Name of the environment variable holding the bearer credential
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

/// Describes the already-deployed function used for fallback verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// URL of the live function; the health query parameter is appended
    pub url: String,
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;

        // Validate: the deploy loop and the fallback probe both need a target
        if config.deploy.endpoints.is_empty() {
            return Err(ConfigError::Validation(
                "No candidate endpoints configured. Add at least one URL to deploy.endpoints"
                    .to_string(),
            ));
        }
        if config.deploy.slug.is_empty() {
            return Err(ConfigError::Validation(
                "deploy.slug must not be empty".to_string(),
            ));
        }
        if config.health.url.is_empty() {
            return Err(ConfigError::Validation(
                "health.url must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp config");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
            [deploy]
            slug = "voice-stream"
            artifact = "functions/voice-stream/index.ts"
            verify_jwt = true
            endpoints = [
                "https://api.example.com/v1/projects/p1/functions",
                "https://api.example.io/v1/projects/p1/functions",
            ]
            token_env = "MY_TOKEN"

            [health]
            url = "https://p1.example.co/functions/v1/voice-stream"
            "#,
        );

        let config = AppConfig::load(file.path()).expect("config should load");
        assert_eq!(config.deploy.slug, "voice-stream");
        assert_eq!(config.deploy.endpoints.len(), 2);
        assert!(config.deploy.verify_jwt);
        assert_eq!(config.deploy.token_env, "MY_TOKEN");
        assert_eq!(
            config.health.url,
            "https://p1.example.co/functions/v1/voice-stream"
        );
    }

    #[test]
    fn test_defaults_applied() {
        let file = write_config(
            r#"
            [deploy]
            slug = "fn"
            artifact = "fn.ts"
            endpoints = ["https://api.example.com/v1/functions"]

            [health]
            url = "https://fn.example.co"
            "#,
        );

        let config = AppConfig::load(file.path()).expect("config should load");
        assert!(!config.deploy.verify_jwt);
        assert_eq!(config.deploy.token_env, DEFAULT_TOKEN_ENV);
    }

    #[test]
    fn test_empty_endpoints_rejected() {
        let file = write_config(
            r#"
            [deploy]
            slug = "fn"
            artifact = "fn.ts"
            endpoints = []

            [health]
            url = "https://fn.example.co"
            "#,
        );

        let err = AppConfig::load(file.path()).expect_err("empty endpoints must fail");
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_empty_slug_rejected() {
        let file = write_config(
            r#"
            [deploy]
            slug = ""
            artifact = "fn.ts"
            endpoints = ["https://api.example.com"]

            [health]
            url = "https://fn.example.co"
            "#,
        );

        let err = AppConfig::load(file.path()).expect_err("empty slug must fail");
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let file = write_config("[deploy\nslug = ");
        let err = AppConfig::load(file.path()).expect_err("malformed toml must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::load("/nonexistent/quickdeploy.toml")
            .expect_err("missing file must fail");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
