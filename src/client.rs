//! GraphQL client for the BuyCoins API.
//!
//! [`BuycoinsClient`] owns the [`RequestExecutor`] and runs the shared
//! execute → validate → extract pipeline. Domain operations live on the
//! borrowed views returned by [`account`](BuycoinsClient::account),
//! [`p2p`](BuycoinsClient::p2p) and [`wallet`](BuycoinsClient::wallet).
//!
//! ```ignore
//! let client = BuycoinsClient::from_env()?;
//! let balances = client.wallet().get_balances(None).await?;
//! let prices = client.p2p().get_prices().await?;
//! ```

use anyhow::Result;
use serde_json::Value;

use crate::account::AccountClient;
use crate::config::ClientConfig;
use crate::error::{BuycoinsError, CredentialError, ErrorCategory, OperationResult};
use crate::executor::{Operation, RequestExecutor};
use crate::p2p::P2pClient;
use crate::validator;
use crate::wallet::WalletClient;

/// BuyCoins GraphQL client.
#[derive(Debug)]
pub struct BuycoinsClient {
    executor: RequestExecutor,
}

impl BuycoinsClient {
    /// Client for the production endpoint.
    pub fn new(auth_key: &str) -> Result<Self, CredentialError> {
        Ok(Self {
            executor: RequestExecutor::new(auth_key)?,
        })
    }

    /// Client for a custom endpoint.
    pub fn with_endpoint(endpoint: &str, auth_key: &str) -> Result<Self, CredentialError> {
        Ok(Self {
            executor: RequestExecutor::with_endpoint(endpoint, auth_key)?,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            executor: RequestExecutor::from_config(config)?,
        })
    }

    /// Client configured from defaults plus `BUYCOINS_AUTH_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ClientConfig::from_env())
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Rotate the auth key; used from the next request on.
    pub fn set_auth_key(&mut self, auth_key: &str) -> Result<(), CredentialError> {
        self.executor.set_auth_key(auth_key)
    }

    // --- Domain views ---

    /// NGNT deposit account operations.
    pub fn account(&self) -> AccountClient<'_> {
        AccountClient::new(self)
    }

    /// Peer-to-peer trading operations.
    pub fn p2p(&self) -> P2pClient<'_> {
        P2pClient::new(self)
    }

    /// Wallet operations.
    pub fn wallet(&self) -> WalletClient<'_> {
        WalletClient::new(self)
    }

    // --- Raw access ---

    /// Run an arbitrary operation and return its validated `data` object.
    ///
    /// Remote errors are tagged with `category`.
    pub async fn query(&self, operation: Operation, category: ErrorCategory) -> OperationResult<Value> {
        let raw = self
            .executor
            .execute(&operation)
            .await
            .map_err(|e| e.response())?;
        validator::check(&raw, category).map_err(|e| e.response())
    }

    /// Execute, validate and pull `field` out of `data`, converting any
    /// failure into its response form.
    pub(crate) async fn run(
        &self,
        operation: Operation,
        category: ErrorCategory,
        field: &str,
    ) -> OperationResult<Value> {
        self.try_run(operation, category, field).await.map_err(|e| {
            log::debug!("{} failed: {}", field, e);
            e.response()
        })
    }

    async fn try_run(
        &self,
        operation: Operation,
        category: ErrorCategory,
        field: &str,
    ) -> Result<Value, BuycoinsError> {
        let raw = self.executor.execute(&operation).await?;
        let data = validator::check(&raw, category)?;
        validator::extract_field(&data, field)
    }
}
