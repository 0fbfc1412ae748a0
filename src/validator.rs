//! Response validation. Sorts a [`RawResult`] into transport error,
//! application error or success.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{BuycoinsError, ErrorCategory};
use crate::executor::{RawResult, TransportFailure};

/// Code reported when no HTTP response was received at all.
const CONNECT_FAILURE_CODE: u16 = 404;

/// Gate a raw result on failure and return the payload's `data` untouched.
///
/// - 4xx transport failures become `Client` errors carrying the body's error
///   detail and the literal status code.
/// - 5xx and undecodable bodies become `Server` errors.
/// - A payload with a non-empty `errors` list becomes an error of `category`
///   with the first message and code 400.
///
/// `raw` is only read, so checking the same result twice yields the same data.
pub fn check(raw: &RawResult, category: ErrorCategory) -> Result<Value, BuycoinsError> {
    match raw {
        RawResult::Transport(failure) => Err(transport_error(failure)),
        RawResult::Payload(payload) => {
            if let Some(message) = first_error_message(payload) {
                log::warn!("{} rejected by API: {}", category, message);
                return Err(BuycoinsError::bad_request(category, message));
            }
            Ok(payload.get("data").cloned().unwrap_or(Value::Null))
        }
    }
}

/// Pull one named field out of a validated `data` object.
pub fn extract_field(data: &Value, field: &str) -> Result<Value, BuycoinsError> {
    data.get(field).cloned().ok_or_else(|| {
        BuycoinsError::new(
            ErrorCategory::Server,
            format!("missing field `{}` in response data", field),
            502,
        )
    })
}

fn transport_error(failure: &TransportFailure) -> BuycoinsError {
    match failure {
        TransportFailure::Connect { reason } => BuycoinsError::new(
            ErrorCategory::Client,
            format!("Failed to establish a connection: {}", reason),
            CONNECT_FAILURE_CODE,
        ),
        TransportFailure::Status { status, body } if (400..500).contains(status) => {
            let message = body
                .as_ref()
                .and_then(embedded_message)
                .unwrap_or_else(|| status_text(*status));
            BuycoinsError::new(ErrorCategory::Client, message, *status)
        }
        TransportFailure::Status { status, .. } if (500..600).contains(status) => BuycoinsError::new(
            ErrorCategory::Server,
            format!("Server error: {}", status_text(*status)),
            *status,
        ),
        TransportFailure::Status { status, .. } => BuycoinsError::new(
            ErrorCategory::Client,
            format!("Request failed: {}", status_text(*status)),
            *status,
        ),
        TransportFailure::Decode { status, reason } => {
            log::warn!("undecodable response body (HTTP {}): {}", status, reason);
            BuycoinsError::new(
                ErrorCategory::Server,
                format!("Invalid response body: {}", reason),
                502,
            )
        }
    }
}

/// First `errors[].message` of a GraphQL payload, if the list is non-empty.
fn first_error_message(payload: &Value) -> Option<String> {
    let first = payload.get("errors")?.as_array()?.first()?;
    Some(
        first
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| first.to_string()),
    )
}

/// Error detail carried in a non-2xx body: GraphQL `errors`, then `message`.
fn embedded_message(body: &Value) -> Option<String> {
    first_error_message(body).or_else(|| {
        body.get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    })
}

fn status_text(status: u16) -> String {
    match StatusCode::from_u16(status).ok().and_then(|s| s.canonical_reason()) {
        Some(reason) => format!("HTTP {} {}", status, reason),
        None => format!("HTTP {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(status: u16, body: Option<Value>) -> RawResult {
        RawResult::Transport(TransportFailure::Status { status, body })
    }

    #[test]
    fn test_404_with_graphql_errors() {
        let raw = status(404, Some(json!({"errors": [{"message": "not found"}]})));
        let err = check(&raw, ErrorCategory::Wallet).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Client);
        assert_eq!(err.message(), "not found");
        assert_eq!(err.code(), 404);
    }

    #[test]
    fn test_401_without_body() {
        let err = check(&status(401, None), ErrorCategory::P2P).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Client);
        assert_eq!(err.code(), 401);
        assert_eq!(err.message(), "HTTP 401 Unauthorized");
    }

    #[test]
    fn test_4xx_plain_message_body() {
        let raw = status(403, Some(json!({"message": "Invalid authentication key"})));
        let err = check(&raw, ErrorCategory::Account).unwrap_err();
        assert_eq!(err.message(), "Invalid authentication key");
        assert_eq!(err.code(), 403);
    }

    #[test]
    fn test_5xx_is_server_error() {
        let raw = status(502, Some(json!({"errors": [{"message": "ignored"}]})));
        let err = check(&raw, ErrorCategory::Wallet).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Server);
        assert_eq!(err.code(), 502);
        assert!(err.message().contains("502"));
    }

    #[test]
    fn test_3xx_is_generic_client_error() {
        let err = check(&status(302, None), ErrorCategory::Wallet).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Client);
        assert_eq!(err.code(), 302);
    }

    #[test]
    fn test_connect_failure() {
        let raw = RawResult::Transport(TransportFailure::Connect {
            reason: "connection refused".into(),
        });
        let err = check(&raw, ErrorCategory::Wallet).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Client);
        assert_eq!(err.code(), 404);
        assert!(err.message().starts_with("Failed to establish a connection"));
    }

    #[test]
    fn test_decode_failure() {
        let raw = RawResult::Transport(TransportFailure::Decode {
            status: 200,
            reason: "expected value".into(),
        });
        let err = check(&raw, ErrorCategory::P2P).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Server);
        assert_eq!(err.code(), 502);
    }

    #[test]
    fn test_application_error_uses_caller_category() {
        let raw = RawResult::Payload(json!({
            "data": null,
            "errors": [{"message": "Insufficient balance"}, {"message": "second"}]
        }));
        let err = check(&raw, ErrorCategory::Wallet).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Wallet);
        assert_eq!(err.message(), "Insufficient balance");
        assert_eq!(err.code(), 400);
    }

    #[test]
    fn test_error_without_message_field() {
        let raw = RawResult::Payload(json!({"errors": [{"code": "E1"}]}));
        let err = check(&raw, ErrorCategory::P2P).unwrap_err();
        assert_eq!(err.message(), r#"{"code":"E1"}"#);
    }

    #[test]
    fn test_empty_errors_list_is_success() {
        let raw = RawResult::Payload(json!({"data": {"getPrices": []}, "errors": []}));
        assert_eq!(check(&raw, ErrorCategory::P2P).unwrap(), json!({"getPrices": []}));
    }

    #[test]
    fn test_success_returns_data_unchanged_and_idempotent() {
        let data = json!({
            "getBalances": [{"id": "A", "cryptocurrency": "bitcoin", "confirmedBalance": 0.009}]
        });
        let raw = RawResult::Payload(json!({"data": data.clone()}));
        let first = check(&raw, ErrorCategory::Wallet).unwrap();
        let second = check(&raw, ErrorCategory::Wallet).unwrap();
        assert_eq!(first, data);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_data_is_null() {
        let raw = RawResult::Payload(json!({}));
        assert_eq!(check(&raw, ErrorCategory::Wallet).unwrap(), Value::Null);
    }

    #[test]
    fn test_extract_field() {
        let data = json!({"createAddress": {"address": "0xabc"}});
        assert_eq!(
            extract_field(&data, "createAddress").unwrap(),
            json!({"address": "0xabc"})
        );
        let err = extract_field(&data, "send").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Server);
        assert_eq!(err.code(), 502);
        assert!(extract_field(&Value::Null, "send").is_err());
    }
}
