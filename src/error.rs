//! Error taxonomy shared by every BuyCoins operation.
//!
//! A single [`BuycoinsError`] carries an [`ErrorCategory`] tag plus the
//! message and status code. Public operations never hand the error itself to
//! callers; they return its [`ErrorResponse`] form instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which layer or domain rejected an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Transport or authentication failure (4xx, unreachable host).
    Client,
    /// Malformed local request (e.g. empty query text).
    Query,
    /// Deposit account operations.
    Account,
    /// Peer-to-peer trading operations.
    P2P,
    /// Wallet operations.
    Wallet,
    /// 5xx responses or unusable response bodies.
    Server,
}

impl ErrorCategory {
    /// Name used in the `status` field of an [`ErrorResponse`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "ClientError",
            Self::Query => "QueryError",
            Self::Account => "AccountError",
            Self::P2P => "P2PError",
            Self::Wallet => "WalletError",
            Self::Server => "ServerError",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized error produced by the response validator or by an operation's
/// own argument checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{category} ({code}): {message}")]
pub struct BuycoinsError {
    category: ErrorCategory,
    message: String,
    code: u16,
}

impl BuycoinsError {
    pub fn new(category: ErrorCategory, message: impl Into<String>, code: u16) -> Self {
        Self {
            category,
            message: message.into(),
            code,
        }
    }

    /// A remote or local rejection with bad-request semantics (code 400).
    pub fn bad_request(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self::new(category, message, 400)
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// The structured record handed back to callers of public operations.
    pub fn response(&self) -> ErrorResponse {
        ErrorResponse {
            status: self.category.as_str().to_string(),
            code: self.code,
            message: self.message.clone(),
        }
    }
}

impl From<BuycoinsError> for ErrorResponse {
    fn from(err: BuycoinsError) -> Self {
        ErrorResponse {
            status: err.category.as_str().to_string(),
            code: err.code,
            message: err.message,
        }
    }
}

/// `{status, code, message}` record returned by a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: u16,
    pub message: String,
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ErrorResponse {}

/// Outcome of every public domain operation.
pub type OperationResult<T> = Result<T, ErrorResponse>;

/// Malformed `identifier:secret` credential.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Credential must be of the form `identifier:secret`")]
    MissingSeparator,
    #[error("Credential identifier is empty")]
    EmptyIdentifier,
    #[error("Credential secret is empty")]
    EmptySecret,
    #[error("No credential configured (set BUYCOINS_AUTH_KEY or `auth_key`)")]
    Missing,
}

impl From<CredentialError> for BuycoinsError {
    fn from(err: CredentialError) -> Self {
        BuycoinsError::new(ErrorCategory::Client, err.to_string(), 401)
    }
}

/// Failures raised while checking an inbound webhook request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Missing signature header: {0}")]
    MissingSignature(String),
    #[error("Signature header is not valid UTF-8")]
    MalformedHeader,
    #[error("Invalid webhook signature")]
    InvalidSignature,
}
