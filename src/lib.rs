//! # BuyCoins SDK
//!
//! Client for the BuyCoins exchange GraphQL API:
//!
//! - **Core**: request execution with Basic auth, response validation, one tagged error type
//! - **Accounts**: NGNT virtual deposit accounts
//! - **P2P**: prices, limit/market orders, order history and the market book
//! - **Wallet**: buy, sell, send, receive addresses, network fees and balances
//! - **Webhooks**: HMAC signature verification for inbound deliveries
//!
//! Every domain operation returns [`OperationResult`]: the requested field of
//! the response on success, or an [`ErrorResponse`] record on failure.

// Core
pub mod config;
pub mod credential;
pub mod error;
pub mod executor;
pub mod validator;
pub mod client;
pub mod types;

// Domain operations
pub mod account;
pub mod p2p;
pub mod wallet;

// Webhooks
pub mod webhook;

// Core exports
pub use client::BuycoinsClient;
pub use config::ClientConfig;
pub use credential::Credential;
pub use error::{BuycoinsError, CredentialError, ErrorCategory, ErrorResponse, OperationResult, WebhookError};
pub use executor::{Operation, RawResult, RequestExecutor, TransportFailure};
pub use types::{Cryptocurrency, OrderSide, OrderStatus, PriceType};

// Domain exports
pub use account::AccountClient;
pub use p2p::P2pClient;
pub use wallet::WalletClient;

// Webhook exports
pub use webhook::{SignatureAlgorithm, SignatureEncoding, WebhookVerifier};
