//! Client configuration: TOML-based config with environment overrides.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::webhook::{SignatureAlgorithm, SignatureEncoding, WebhookVerifier};

/// Production GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://backend.buycoins.tech/api/graphql";

/// Header the exchange puts the webhook signature in.
pub const DEFAULT_WEBHOOK_HEADER: &str = "X-Webhook-Signature";

/// Environment variable holding the `identifier:secret` auth key.
pub const AUTH_KEY_ENV: &str = "BUYCOINS_AUTH_KEY";

/// SDK configuration (stored as `buycoins.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// GraphQL endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Auth key in `identifier:secret` form
    pub auth_key: Option<String>,

    /// Request timeout; unset leaves the HTTP client's default in place
    pub timeout_secs: Option<u64>,

    /// Header carrying the webhook signature
    #[serde(default = "default_webhook_header")]
    pub webhook_header: String,

    #[serde(default)]
    pub webhook_algorithm: SignatureAlgorithm,

    #[serde(default)]
    pub webhook_encoding: SignatureEncoding,
}

fn default_endpoint() -> String { DEFAULT_ENDPOINT.into() }
fn default_webhook_header() -> String { DEFAULT_WEBHOOK_HEADER.into() }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            auth_key: None,
            timeout_secs: None,
            webhook_header: default_webhook_header(),
            webhook_algorithm: SignatureAlgorithm::default(),
            webhook_encoding: SignatureEncoding::default(),
        }
    }
}

impl ClientConfig {
    /// Default config with `auth_key` taken from `BUYCOINS_AUTH_KEY`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load config from a TOML file, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Save config to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(AUTH_KEY_ENV) {
            if !key.trim().is_empty() {
                self.auth_key = Some(key);
            }
        }
    }

    pub fn with_auth_key(mut self, auth_key: impl Into<String>) -> Self {
        self.auth_key = Some(auth_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Build a webhook verifier from the configured scheme and shared secret.
    pub fn webhook_verifier(&self, shared_secret: impl AsRef<[u8]>) -> WebhookVerifier {
        WebhookVerifier::new(shared_secret)
            .with_algorithm(self.webhook_algorithm)
            .with_encoding(self.webhook_encoding)
            .with_header(self.webhook_header.clone())
    }
}
