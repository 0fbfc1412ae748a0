//! GraphQL request executor for the BuyCoins backend.
//!
//! Posts `{query, variables}` to the endpoint with Basic authentication and
//! hands back whatever came back as a [`RawResult`]. Transport failures are
//! values, not errors; only local precondition failures (empty query,
//! malformed credential) come back as `Err`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{ClientConfig, DEFAULT_ENDPOINT};
use crate::credential::Credential;
use crate::error::{BuycoinsError, CredentialError, ErrorCategory};

/// A GraphQL query or mutation plus its variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    query: String,
    variables: Map<String, Value>,
}

impl Operation {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
        }
    }

    /// Bind a variable. Insertion order is kept in the request body.
    pub fn var(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.variables.insert(name.to_string(), value.into());
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }
}

/// Why a request produced no usable payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    /// DNS, TCP, TLS or timeout failure; no HTTP status was received.
    Connect { reason: String },
    /// Non-2xx response. `body` holds the decoded JSON body, if it had one.
    Status { status: u16, body: Option<Value> },
    /// 2xx response whose body was not a JSON object.
    Decode { status: u16, reason: String },
}

/// What a single executed request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    /// Decoded GraphQL response object (`data` and/or `errors`).
    Payload(Value),
    Transport(TransportFailure),
}

/// Sends GraphQL operations to the BuyCoins endpoint.
///
/// The auth key is kept as the raw `identifier:secret` string and re-parsed
/// on every request, so a key swapped in with [`set_auth_key`] takes effect
/// on the next call.
///
/// [`set_auth_key`]: RequestExecutor::set_auth_key
pub struct RequestExecutor {
    endpoint: String,
    auth_key: String,
    http: reqwest::Client,
}

impl RequestExecutor {
    /// Executor for the production endpoint.
    pub fn new(auth_key: &str) -> Result<Self, CredentialError> {
        Self::with_endpoint(DEFAULT_ENDPOINT, auth_key)
    }

    /// Executor for a custom endpoint (staging, mock servers).
    pub fn with_endpoint(endpoint: &str, auth_key: &str) -> Result<Self, CredentialError> {
        Credential::parse(auth_key)?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            auth_key: auth_key.to_string(),
            http: reqwest::Client::new(),
        })
    }

    /// Build from configuration, applying the optional request timeout.
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        let auth_key = config.auth_key.as_deref().ok_or(CredentialError::Missing)?;
        Credential::parse(auth_key)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            endpoint: config.endpoint.clone(),
            auth_key: auth_key.to_string(),
            http: builder.build()?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Replace the auth key. The old key stays in place if the new one is malformed.
    pub fn set_auth_key(&mut self, auth_key: &str) -> Result<(), CredentialError> {
        Credential::parse(auth_key)?;
        self.auth_key = auth_key.to_string();
        Ok(())
    }

    /// Submit one operation and return the raw outcome.
    pub async fn execute(&self, operation: &Operation) -> Result<RawResult, BuycoinsError> {
        if operation.query().trim().is_empty() {
            return Err(BuycoinsError::bad_request(
                ErrorCategory::Query,
                "Invalid query passed!",
            ));
        }
        let credential = Credential::parse(&self.auth_key)?;

        log::debug!(
            "POST {} ({} variables) as {}",
            self.endpoint,
            operation.variables().len(),
            credential.identifier()
        );

        let response = match self
            .http
            .post(&self.endpoint)
            .basic_auth(credential.identifier(), Some(credential.secret()))
            .json(operation)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("request to {} failed: {}", self.endpoint, e);
                return Ok(RawResult::Transport(TransportFailure::Connect {
                    reason: e.to_string(),
                }));
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("reading response from {} failed: {}", self.endpoint, e);
                return Ok(RawResult::Transport(TransportFailure::Connect {
                    reason: e.to_string(),
                }));
            }
        };

        if !status.is_success() {
            log::warn!("{} answered HTTP {}", self.endpoint, status);
            return Ok(RawResult::Transport(TransportFailure::Status {
                status: status.as_u16(),
                body: serde_json::from_slice(&bytes).ok(),
            }));
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(payload) if payload.is_object() => Ok(RawResult::Payload(payload)),
            Ok(_) => Ok(RawResult::Transport(TransportFailure::Decode {
                status: status.as_u16(),
                reason: "response body is not a JSON object".to_string(),
            })),
            Err(e) => Ok(RawResult::Transport(TransportFailure::Decode {
                status: status.as_u16(),
                reason: e.to_string(),
            })),
        }
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("endpoint", &self.endpoint)
            .field("auth_key", &"[REDACTED]")
            .finish()
    }
}
