//! Peer-to-peer trading: prices, limit and market orders, order books.
//!
//! ```ignore
//! let p2p = client.p2p();
//! let price = p2p.get_current_price("buy", "bitcoin").await?;
//! let order = p2p.place_limit_order("sell", 0.05, "bitcoin", "static", 16_500_000.0).await?;
//! ```

use serde_json::Value;

use crate::client::BuycoinsClient;
use crate::error::{BuycoinsError, ErrorCategory, OperationResult};
use crate::executor::Operation;
use crate::types::{check_amount, parse_arg, Cryptocurrency, OrderSide, OrderStatus, PriceType};

const GET_PRICES: &str = r#"
query {
  getPrices {
    id
    cryptocurrency
    buyPricePerCoin
    minBuy
    maxBuy
    expiresAt
  }
}
"#;

const GET_CURRENT_PRICE: &str = r#"
query GetBuyCoinsPrices($side: OrderSide, $currency: Cryptocurrency) {
  getPrices(side: $side, cryptocurrency: $currency) {
    buyPricePerCoin
    cryptocurrency
    id
    maxBuy
    maxSell
    minBuy
    minCoinAmount
    minSell
    sellPricePerCoin
    status
  }
}
"#;

const GET_DYNAMIC_PRICE_EXPIRY: &str = r#"
query GetOrders($status: GetOrdersStatus!, $side: OrderSide, $currency: Cryptocurrency) {
  getOrders(status: $status, side: $side, cryptocurrency: $currency) {
    dynamicPriceExpiry
  }
}
"#;

const POST_LIMIT_ORDER: &str = r#"
mutation PostLimitOrder($orderSide: OrderSide!, $coinAmount: BigDecimal!, $cryptocurrency: Cryptocurrency, $staticPrice: BigDecimal, $priceType: PriceType!, $dynamicExchangeRate: BigDecimal) {
  postLimitOrder(orderSide: $orderSide, coinAmount: $coinAmount, cryptocurrency: $cryptocurrency, staticPrice: $staticPrice, priceType: $priceType, dynamicExchangeRate: $dynamicExchangeRate) {
    id
    cryptocurrency
    coinAmount
    side
    status
    createdAt
    pricePerCoin
    priceType
    staticPrice
    dynamicExchangeRate
  }
}
"#;

const POST_MARKET_ORDER: &str = r#"
mutation PostMarketOrder($orderSide: OrderSide!, $coinAmount: BigDecimal!, $cryptocurrency: Cryptocurrency) {
  postMarketOrder(orderSide: $orderSide, coinAmount: $coinAmount, cryptocurrency: $cryptocurrency) {
    id
    cryptocurrency
    coinAmount
    side
    status
    createdAt
    pricePerCoin
    priceType
    staticPrice
    dynamicExchangeRate
  }
}
"#;

const GET_ORDERS: &str = r#"
query GetOrders($status: GetOrdersStatus!) {
  getOrders(status: $status) {
    dynamicPriceExpiry
    orders {
      edges {
        node {
          id
          cryptocurrency
          coinAmount
          side
          status
          createdAt
          pricePerCoin
          priceType
          staticPrice
          dynamicExchangeRate
        }
      }
    }
  }
}
"#;

const GET_MARKET_BOOK: &str = r#"
query {
  getMarketBook {
    dynamicPriceExpiry
    orders {
      edges {
        node {
          id
          cryptocurrency
          coinAmount
          side
          status
          createdAt
          pricePerCoin
          priceType
          staticPrice
          dynamicExchangeRate
        }
      }
    }
  }
}
"#;

const CATEGORY: ErrorCategory = ErrorCategory::P2P;

/// P2P trading operations, borrowed from a [`BuycoinsClient`].
pub struct P2pClient<'a> {
    client: &'a BuycoinsClient,
}

impl<'a> P2pClient<'a> {
    pub(crate) fn new(client: &'a BuycoinsClient) -> Self {
        Self { client }
    }

    /// Current buy prices for every supported coin.
    pub async fn get_prices(&self) -> OperationResult<Value> {
        self.client
            .run(Operation::new(GET_PRICES), CATEGORY, "getPrices")
            .await
    }

    /// Current `side` price for one coin.
    pub async fn get_current_price(&self, side: &str, currency: &str) -> OperationResult<Value> {
        let side: OrderSide = parse_arg(side, CATEGORY)?;
        let currency: Cryptocurrency = parse_arg(currency, CATEGORY)?;

        let operation = Operation::new(GET_CURRENT_PRICE)
            .var("side", side.as_str())
            .var("currency", currency.as_str());
        self.client.run(operation, CATEGORY, "getPrices").await
    }

    /// Expiry timestamp of the current dynamic price.
    pub async fn get_dynamic_price_expiry(
        &self,
        status: &str,
        side: &str,
        currency: &str,
    ) -> OperationResult<Value> {
        let status: OrderStatus = parse_arg(status, CATEGORY)?;
        let side: OrderSide = parse_arg(side, CATEGORY)?;
        let currency: Cryptocurrency = parse_arg(currency, CATEGORY)?;

        let operation = Operation::new(GET_DYNAMIC_PRICE_EXPIRY)
            .var("status", status.as_str())
            .var("side", side.as_str())
            .var("currency", currency.as_str());
        self.client.run(operation, CATEGORY, "getOrders").await
    }

    /// Place a limit order.
    ///
    /// For a `static` price type, `price` is the naira price per coin; for
    /// `dynamic`, it is the exchange rate applied to the market price.
    pub async fn place_limit_order(
        &self,
        side: &str,
        coin_amount: f64,
        currency: &str,
        price_type: &str,
        price: f64,
    ) -> OperationResult<Value> {
        let side: OrderSide = parse_arg(side, CATEGORY)?;
        let currency: Cryptocurrency = parse_arg(currency, CATEGORY)?;
        let price_type: PriceType = parse_arg(price_type, CATEGORY)?;
        check_amount(coin_amount, "coin amount", CATEGORY)?;

        let operation = Operation::new(POST_LIMIT_ORDER)
            .var("orderSide", side.as_str())
            .var("coinAmount", coin_amount)
            .var("cryptocurrency", currency.as_str())
            .var("priceType", price_type.as_str());
        let operation = match price_type {
            PriceType::Static => {
                check_amount(price, "static price", CATEGORY)?;
                operation.var("staticPrice", price)
            }
            PriceType::Dynamic => {
                check_amount(price, "dynamic exchange rate", CATEGORY)?;
                operation.var("dynamicExchangeRate", price)
            }
        };
        self.client.run(operation, CATEGORY, "postLimitOrder").await
    }

    /// Post a market order, filled at the best available price.
    pub async fn post_market_order(
        &self,
        side: &str,
        coin_amount: f64,
        currency: &str,
    ) -> OperationResult<Value> {
        let side: OrderSide = parse_arg(side, CATEGORY)?;
        let currency: Cryptocurrency = parse_arg(currency, CATEGORY)?;
        check_amount(coin_amount, "coin amount", CATEGORY)?;

        let operation = Operation::new(POST_MARKET_ORDER)
            .var("orderSide", side.as_str())
            .var("coinAmount", coin_amount)
            .var("cryptocurrency", currency.as_str());
        self.client.run(operation, CATEGORY, "postMarketOrder").await
    }

    /// The user's orders with the given status (`open` or `completed`).
    pub async fn get_orders(&self, status: &str) -> OperationResult<Value> {
        let status: OrderStatus = parse_arg(status, CATEGORY)?;

        let operation = Operation::new(GET_ORDERS).var("status", status.as_str());
        self.client.run(operation, CATEGORY, "getOrders").await
    }

    /// Open orders from all users.
    pub async fn get_market_book(&self) -> OperationResult<Value> {
        self.client
            .run(Operation::new(GET_MARKET_BOOK), CATEGORY, "getMarketBook")
            .await
    }

    /// ID of the current `side` price for `currency`, as required by the
    /// wallet's buy and sell mutations.
    pub(crate) async fn current_price_id(
        &self,
        side: OrderSide,
        currency: Cryptocurrency,
    ) -> OperationResult<String> {
        let prices = self.get_current_price(side.as_str(), currency.as_str()).await?;
        let entry = match &prices {
            Value::Array(list) => list.first(),
            other => Some(other),
        };
        entry
            .and_then(|p| p.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                BuycoinsError::new(
                    ErrorCategory::Server,
                    format!("no {} price available for {}", side.as_str(), currency.as_str()),
                    502,
                )
                .response()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> BuycoinsClient {
        // Nothing listens on port 1: any request that leaves the process
        // comes back as a ClientError, never a P2PError.
        BuycoinsClient::with_endpoint("http://127.0.0.1:1/graphql", "pub:secret").unwrap()
    }

    #[tokio::test]
    async fn test_invalid_arguments_rejected_locally() {
        let client = offline_client();
        let p2p = client.p2p();

        let cases = [
            p2p.get_current_price("hold", "bitcoin").await,
            p2p.get_current_price("buy", "dogecoin").await,
            p2p.get_dynamic_price_expiry("pending", "buy", "bitcoin").await,
            p2p.get_orders("cancelled").await,
            p2p.post_market_order("buy", 0.0, "bitcoin").await,
            p2p.post_market_order("buy", 0.1, "monero").await,
            p2p.place_limit_order("buy", 1.0, "bitcoin", "floating", 100.0).await,
            p2p.place_limit_order("buy", 1.0, "bitcoin", "static", -5.0).await,
            p2p.place_limit_order("sell", f64::NAN, "ethereum", "dynamic", 1.1).await,
        ];
        for result in cases {
            let resp = result.unwrap_err();
            assert_eq!(resp.status, "P2PError", "{}", resp);
            assert_eq!(resp.code, 400);
        }
    }

    #[tokio::test]
    async fn test_unsupported_currency_message() {
        let client = offline_client();
        let resp = client.p2p().get_current_price("buy", "xrp").await.unwrap_err();
        assert_eq!(resp.message, "Invalid or unsupported cryptocurrency");
    }
}
