//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The
//! configuration file path defaults to `config.yaml` but can be specified via the `-f` flag or
//! the `DOCLENS_CONFIG` environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `DOCLENS_` override YAML values
//! 3. **Deployment variables** - `PORT`, `GCP_PROJECT`, `GCP_REGION` and `GCP_API_KEY` are
//!    accepted unprefixed, matching the variables the service is provisioned with
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `DOCLENS_GEMINI__MODEL=gemini-2.5-pro` sets the `gemini.model` field.
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! # Override server port
//! PORT=9090
//!
//! # Provider credentials (preferred method)
//! GCP_API_KEY="..."
//!
//! # Or use the prefixed form
//! DOCLENS_GEMINI__API_KEY="..."
//! DOCLENS_GEMINI__TIMEOUT="30s"
//! ```
//!
//! A missing API key is deliberately not a startup error: outbound calls will fail and surface
//! through the generic error path instead, so the service can boot in environments where
//! credentials are injected late.

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "DOCLENS_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment variables.
/// All fields have sensible defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Gemini provider configuration
    pub gemini: GeminiConfig,
    /// Resource limits for protecting system capacity
    pub limits: LimitsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            gemini: GeminiConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

/// Gemini provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeminiConfig {
    /// GCP project identifier (informational, carried for deployment parity)
    pub project: Option<String>,
    /// GCP region (informational, carried for deployment parity)
    pub region: Option<String>,
    /// API key sent as `x-goog-api-key`. Absence is not validated upfront; calls fail at
    /// request time instead.
    pub api_key: Option<String>,
    /// Model name used for content generation
    pub model: String,
    /// Base URL of the generative language API. Overridable for testing against a local mock.
    pub base_url: Url,
    /// Upper bound on the whole outbound round trip
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            project: None,
            region: None,
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: Url::parse("https://generativelanguage.googleapis.com").expect("static URL is valid"),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Resource limits for incoming requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum accepted multipart body size in bytes
    pub max_upload_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(figment::Error::from)?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("DOCLENS_").split("__"))
            // Common deployment variables, accepted unprefixed
            .merge(Env::raw().only(&["PORT"]))
            .merge(Env::raw().only(&["GCP_PROJECT"]).map(|_| "gemini.project".into()).split("."))
            .merge(Env::raw().only(&["GCP_REGION"]).map(|_| "gemini.region".into()).split("."))
            .merge(Env::raw().only(&["GCP_API_KEY"]).map(|_| "gemini.api_key".into()).split("."))
    }

    /// Validate the configuration for consistency.
    ///
    /// Note: a missing `gemini.api_key` is intentionally accepted here.
    pub fn validate(&self) -> Result<(), String> {
        if self.limits.max_upload_bytes == 0 {
            return Err("Config validation: limits.max_upload_bytes must be greater than zero".to_string());
        }
        if self.gemini.model.is_empty() {
            return Err("Config validation: gemini.model must not be empty".to_string());
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let args = Args {
                config: "missing.yaml".to_string(),
                validate: false,
            };

            let config = Config::load(&args)?;

            assert_eq!(config.host, "0.0.0.0");
            assert_eq!(config.port, 8080);
            assert_eq!(config.gemini.model, "gemini-2.5-flash");
            assert_eq!(config.gemini.base_url.as_str(), "https://generativelanguage.googleapis.com/");
            assert_eq!(config.gemini.timeout, Duration::from_secs(120));
            assert!(config.gemini.api_key.is_none());

            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
port: 3000
gemini:
  model: gemini-2.5-pro
  timeout: 30s
"#,
            )?;

            jail.set_env("DOCLENS_HOST", "127.0.0.1");
            jail.set_env("DOCLENS_GEMINI__API_KEY", "prefixed-key");

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };

            let config = Config::load(&args)?;

            // Env vars should override
            assert_eq!(config.host, "127.0.0.1");
            assert_eq!(config.gemini.api_key.as_deref(), Some("prefixed-key"));

            // YAML values should be preserved
            assert_eq!(config.port, 3000);
            assert_eq!(config.gemini.model, "gemini-2.5-pro");
            assert_eq!(config.gemini.timeout, Duration::from_secs(30));

            Ok(())
        });
    }

    #[test]
    fn test_deployment_variables() {
        Jail::expect_with(|jail| {
            jail.set_env("PORT", "9090");
            jail.set_env("GCP_PROJECT", "acme-prod");
            jail.set_env("GCP_REGION", "southamerica-east1");
            jail.set_env("GCP_API_KEY", "raw-key");

            let args = Args {
                config: "missing.yaml".to_string(),
                validate: false,
            };

            let config = Config::load(&args)?;

            assert_eq!(config.port, 9090);
            assert_eq!(config.gemini.project.as_deref(), Some("acme-prod"));
            assert_eq!(config.gemini.region.as_deref(), Some("southamerica-east1"));
            assert_eq!(config.gemini.api_key.as_deref(), Some("raw-key"));

            Ok(())
        });
    }

    #[test]
    fn test_invalid_limits_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
limits:
  max_upload_bytes: 0
"#,
            )?;

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };

            assert!(Config::load(&args).is_err());

            Ok(())
        });
    }
}
