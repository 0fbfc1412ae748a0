//! Wallet operations: buy, sell, send, receive addresses and balances.
//!
//! ```ignore
//! let wallet = client.wallet();
//! let fee = wallet.get_network_fee("bitcoin", 0.02).await?;
//! let tx = wallet.send_crypto("1MmyYvSEYLCPm45Ps6vQin1heGBv3UpNbf", "bitcoin", 0.02).await?;
//! let balances = wallet.get_balances(Some("bitcoin")).await?;
//! ```

use serde_json::Value;

use crate::client::BuycoinsClient;
use crate::error::{BuycoinsError, ErrorCategory, OperationResult};
use crate::executor::Operation;
use crate::types::{check_amount, parse_arg, Cryptocurrency, OrderSide};

const BUY: &str = r#"
mutation BuyCoin($price: ID!, $coin_amount: BigDecimal!, $currency: Cryptocurrency) {
  buy(price: $price, coin_amount: $coin_amount, cryptocurrency: $currency) {
    id
    cryptocurrency
    status
    totalCoinAmount
    side
  }
}
"#;

const SELL: &str = r#"
mutation SellCoin($price: ID!, $coin_amount: BigDecimal!, $currency: Cryptocurrency) {
  sell(price: $price, coin_amount: $coin_amount, cryptocurrency: $currency) {
    id
    cryptocurrency
    status
    totalCoinAmount
    side
  }
}
"#;

const NETWORK_FEE: &str = r#"
query NetworkFee($currency: Cryptocurrency, $amount: BigDecimal!) {
  getEstimatedNetworkFee(cryptocurrency: $currency, amount: $amount) {
    estimatedFee
    total
  }
}
"#;

const CREATE_ADDRESS: &str = r#"
mutation CreateWalletAddress($currency: Cryptocurrency) {
  createAddress(cryptocurrency: $currency) {
    cryptocurrency
    address
  }
}
"#;

const SEND: &str = r#"
mutation SendCoin($amount: BigDecimal!, $currency: Cryptocurrency, $address: String!) {
  send(cryptocurrency: $currency, amount: $amount, address: $address) {
    id
    address
    amount
    cryptocurrency
    fee
    status
    transaction {
      txhash
      id
    }
  }
}
"#;

const GET_BALANCES: &str = r#"
query GetBalances($currency: Cryptocurrency) {
  getBalances(cryptocurrency: $currency) {
    id
    cryptocurrency
    confirmedBalance
  }
}
"#;

const CATEGORY: ErrorCategory = ErrorCategory::Wallet;

/// Wallet operations, borrowed from a [`BuycoinsClient`].
pub struct WalletClient<'a> {
    client: &'a BuycoinsClient,
}

impl<'a> WalletClient<'a> {
    pub(crate) fn new(client: &'a BuycoinsClient) -> Self {
        Self { client }
    }

    /// Buy `coin_amount` of `currency` at the current buy price.
    ///
    /// Looks up the live price ID first, so this makes two requests.
    pub async fn buy_crypto(&self, currency: &str, coin_amount: f64) -> OperationResult<Value> {
        self.trade(OrderSide::Buy, currency, coin_amount).await
    }

    /// Sell `coin_amount` of `currency` at the current sell price.
    pub async fn sell_crypto(&self, currency: &str, coin_amount: f64) -> OperationResult<Value> {
        self.trade(OrderSide::Sell, currency, coin_amount).await
    }

    async fn trade(&self, side: OrderSide, currency: &str, coin_amount: f64) -> OperationResult<Value> {
        let currency: Cryptocurrency = parse_arg(currency, CATEGORY)?;
        check_amount(coin_amount, "coin amount", CATEGORY)?;

        let price_id = self.client.p2p().current_price_id(side, currency).await?;
        let (query, field) = match side {
            OrderSide::Buy => (BUY, "buy"),
            OrderSide::Sell => (SELL, "sell"),
        };
        let operation = Operation::new(query)
            .var("price", price_id)
            .var("coin_amount", coin_amount)
            .var("currency", currency.as_str());
        self.client.run(operation, CATEGORY, field).await
    }

    /// Estimated network fee for sending `amount` of `currency`.
    pub async fn get_network_fee(&self, currency: &str, amount: f64) -> OperationResult<Value> {
        let currency: Cryptocurrency = parse_arg(currency, CATEGORY)?;
        check_amount(amount, "amount", CATEGORY)?;

        let operation = Operation::new(NETWORK_FEE)
            .var("currency", currency.as_str())
            .var("amount", amount);
        self.client
            .run(operation, CATEGORY, "getEstimatedNetworkFee")
            .await
    }

    /// Create a receive address for `currency`.
    pub async fn create_address(&self, currency: &str) -> OperationResult<Value> {
        let currency: Cryptocurrency = parse_arg(currency, CATEGORY)?;

        let operation = Operation::new(CREATE_ADDRESS).var("currency", currency.as_str());
        self.client.run(operation, CATEGORY, "createAddress").await
    }

    /// Send `amount` of `currency` to an external `address`.
    pub async fn send_crypto(&self, address: &str, currency: &str, amount: f64) -> OperationResult<Value> {
        let currency: Cryptocurrency = parse_arg(currency, CATEGORY)?;
        check_amount(amount, "amount", CATEGORY)?;
        if address.is_empty() || address.chars().any(char::is_whitespace) {
            return Err(BuycoinsError::bad_request(CATEGORY, "Invalid address").response());
        }

        let operation = Operation::new(SEND)
            .var("amount", amount)
            .var("currency", currency.as_str())
            .var("address", address);
        self.client.run(operation, CATEGORY, "send").await
    }

    /// Confirmed balances, for one coin or (with `None`) every coin.
    pub async fn get_balances(&self, currency: Option<&str>) -> OperationResult<Value> {
        let currency = currency
            .map(|c| parse_arg::<Cryptocurrency>(c, CATEGORY))
            .transpose()?;

        let operation = Operation::new(GET_BALANCES)
            .var("currency", currency.map(|c| c.as_str()));
        self.client.run(operation, CATEGORY, "getBalances").await
    }
}
