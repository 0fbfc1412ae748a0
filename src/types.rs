//! Argument allow-lists accepted by the BuyCoins API.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::error::{BuycoinsError, ErrorCategory, ErrorResponse};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported {kind}: {value:?}")]
pub struct UnsupportedValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnsupportedValue {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

/// Parse an operation argument, rejecting it with `category` if it is not
/// in the allow-list.
pub(crate) fn parse_arg<T>(value: &str, category: ErrorCategory) -> Result<T, ErrorResponse>
where
    T: FromStr<Err = UnsupportedValue>,
{
    value.parse().map_err(|err: UnsupportedValue| {
        BuycoinsError::bad_request(category, format!("Invalid or unsupported {}", err.kind)).response()
    })
}

/// Coin and naira amounts must be finite and strictly positive.
pub(crate) fn check_amount(amount: f64, what: &str, category: ErrorCategory) -> Result<(), ErrorResponse> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(BuycoinsError::bad_request(category, format!("Invalid {} passed", what)).response())
    }
}

/// Cryptocurrencies the exchange trades and holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cryptocurrency {
    Bitcoin,
    Ethereum,
    Litecoin,
    NairaToken,
    UsdCoin,
    UsdTether,
}

impl Cryptocurrency {
    pub const ALL: [Cryptocurrency; 6] = [
        Self::Bitcoin,
        Self::Ethereum,
        Self::Litecoin,
        Self::NairaToken,
        Self::UsdCoin,
        Self::UsdTether,
    ];

    /// GraphQL enum value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bitcoin => "bitcoin",
            Self::Ethereum => "ethereum",
            Self::Litecoin => "litecoin",
            Self::NairaToken => "naira_token",
            Self::UsdCoin => "usd_coin",
            Self::UsdTether => "usd_tether",
        }
    }
}

impl FromStr for Cryptocurrency {
    type Err = UnsupportedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnsupportedValue::new("cryptocurrency", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl FromStr for OrderSide {
    type Err = UnsupportedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            _ => Err(UnsupportedValue::new("order side", s)),
        }
    }
}

/// Filter for `getOrders`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = UnsupportedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "completed" => Ok(Self::Completed),
            _ => Err(UnsupportedValue::new("order status", s)),
        }
    }
}

/// Limit order pricing: a fixed naira price, or a rate tracking the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Static,
    Dynamic,
}

impl PriceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
        }
    }
}

impl FromStr for PriceType {
    type Err = UnsupportedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Self::Static),
            "dynamic" => Ok(Self::Dynamic),
            _ => Err(UnsupportedValue::new("price type", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cryptocurrency_allow_list() {
        for c in Cryptocurrency::ALL {
            assert_eq!(c.as_str().parse::<Cryptocurrency>().unwrap(), c);
            assert_eq!(serde_json::to_value(c).unwrap(), c.as_str());
        }
        assert!("dogecoin".parse::<Cryptocurrency>().is_err());
        assert!("Bitcoin".parse::<Cryptocurrency>().is_err());
        assert!("".parse::<Cryptocurrency>().is_err());
    }

    #[test]
    fn test_side_status_price_type() {
        assert_eq!("sell".parse::<OrderSide>().unwrap(), OrderSide::Sell);
        assert!("short".parse::<OrderSide>().is_err());
        assert_eq!("completed".parse::<OrderStatus>().unwrap(), OrderStatus::Completed);
        assert!("pending".parse::<OrderStatus>().is_err());
        assert_eq!("dynamic".parse::<PriceType>().unwrap(), PriceType::Dynamic);
        assert!("floating".parse::<PriceType>().is_err());
    }

    #[test]
    fn test_parse_arg_maps_to_category() {
        let side: OrderSide = parse_arg("buy", ErrorCategory::P2P).unwrap();
        assert_eq!(side, OrderSide::Buy);

        let err = parse_arg::<Cryptocurrency>("dogecoin", ErrorCategory::Wallet).unwrap_err();
        assert_eq!(err.status, "WalletError");
        assert_eq!(err.code, 400);
        assert_eq!(err.message, "Invalid or unsupported cryptocurrency");
    }

    #[test]
    fn test_check_amount() {
        assert!(check_amount(0.01, "coin amount", ErrorCategory::Wallet).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = check_amount(bad, "coin amount", ErrorCategory::Wallet).unwrap_err();
            assert_eq!(err.message, "Invalid coin amount passed");
        }
    }

    #[test]
    fn test_unsupported_value_message() {
        let err = "xrp".parse::<Cryptocurrency>().unwrap_err();
        assert_eq!(err.to_string(), r#"unsupported cryptocurrency: "xrp""#);
    }
}
