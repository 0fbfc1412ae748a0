//! NGNT deposit accounts.
//!
//! Virtual bank accounts that credit naira deposits to the user's NGNT
//! balance.

use serde_json::Value;

use crate::client::BuycoinsClient;
use crate::error::{BuycoinsError, ErrorCategory, OperationResult};
use crate::executor::Operation;

const CREATE_DEPOSIT_ACCOUNT: &str = r#"
mutation createDepositAccount($accountName: String!) {
  createDepositAccount(accountName: $accountName) {
    accountNumber
    accountName
    accountType
    bankName
    accountReference
  }
}
"#;

/// Deposit account operations, borrowed from a [`BuycoinsClient`].
pub struct AccountClient<'a> {
    client: &'a BuycoinsClient,
}

impl<'a> AccountClient<'a> {
    pub(crate) fn new(client: &'a BuycoinsClient) -> Self {
        Self { client }
    }

    /// Create a virtual deposit account under `account_name`.
    ///
    /// Returns the `createDepositAccount` object (account number, bank name,
    /// reference).
    pub async fn create_deposit_account(&self, account_name: &str) -> OperationResult<Value> {
        if account_name.trim().is_empty() {
            return Err(BuycoinsError::bad_request(
                ErrorCategory::Account,
                "Invalid account name passed",
            )
            .response());
        }

        let operation = Operation::new(CREATE_DEPOSIT_ACCOUNT).var("accountName", account_name);
        self.client
            .run(operation, ErrorCategory::Account, "createDepositAccount")
            .await
    }
}
