//! Transaction - the single strict record every analyzer reads
//!
//! Upstream ledgers hand us loosely-typed payloads. They are parsed into
//! `Transaction` once and validated at the boundary; analyzers assume a
//! validated value and never re-check it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::amount::{Amount, AmountError};
use crate::currency::Currency;

/// Malformed transaction input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Transaction id is empty")]
    MissingId,

    #[error("Transaction {id} is missing {field}")]
    MissingAccount { id: String, field: &'static str },

    #[error("Duplicate transaction id in batch: {0}")]
    DuplicateId(String),

    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// Kind of movement reported by the ledger
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    #[default]
    Transfer,
    Deposit,
    Withdrawal,
    Payment,
    Exchange,
}

/// A transaction as seen by the detection engine.
///
/// `timestamp` is the business time reported by the ledger; `created_at`
/// is when the ledger recorded it. Velocity and batch windows use
/// `created_at`, time-of-day risk uses `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: Amount,
    pub from_account_id: String,
    pub to_account_id: String,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub transaction_type: TransactionType,
}

impl Transaction {
    /// Create a transfer with a generated id, recorded at `timestamp`.
    pub fn new(
        from_account_id: impl Into<String>,
        to_account_id: impl Into<String>,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, TransactionError> {
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            amount: Amount::new(amount)?,
            from_account_id: from_account_id.into(),
            to_account_id: to_account_id.into(),
            timestamp,
            created_at: timestamp,
            currency: Currency::default(),
            transaction_type: TransactionType::default(),
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    /// True if `account_id` is the source or the destination.
    pub fn involves(&self, account_id: &str) -> bool {
        self.from_account_id == account_id || self.to_account_id == account_id
    }

    /// Check required identifiers.
    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.id.trim().is_empty() {
            return Err(TransactionError::MissingId);
        }
        if self.from_account_id.trim().is_empty() {
            return Err(TransactionError::MissingAccount {
                id: self.id.clone(),
                field: "fromAccountId",
            });
        }
        if self.to_account_id.trim().is_empty() {
            return Err(TransactionError::MissingAccount {
                id: self.id.clone(),
                field: "toAccountId",
            });
        }
        Ok(())
    }
}

/// Validate every transaction of a batch and reject duplicate ids.
///
/// Batch analyzers count transactions by id, so a repeated id would make
/// the union-based counts ambiguous.
pub fn validate_batch(batch: &[Transaction]) -> Result<(), TransactionError> {
    let mut seen = HashSet::with_capacity(batch.len());
    for tx in batch {
        tx.validate()?;
        if !seen.insert(tx.id.as_str()) {
            return Err(TransactionError::DuplicateId(tx.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_new_transaction_defaults() {
        let tx = Transaction::new("ACC-A", "ACC-B", dec!(2500), at(10)).unwrap();
        assert!(!tx.id.is_empty());
        assert_eq!(tx.created_at, tx.timestamp);
        assert_eq!(tx.currency, Currency::Idr);
        assert_eq!(tx.transaction_type, TransactionType::Transfer);
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = Transaction::new("ACC-A", "ACC-B", dec!(-1), at(10));
        assert!(matches!(result, Err(TransactionError::Amount(_))));
    }

    #[test]
    fn test_missing_account_rejected() {
        let tx = Transaction::new("ACC-A", "  ", dec!(10), at(10)).unwrap();
        assert!(matches!(
            tx.validate(),
            Err(TransactionError::MissingAccount { field: "toAccountId", .. })
        ));

        let tx = Transaction::new("", "ACC-B", dec!(10), at(10)).unwrap();
        assert!(matches!(
            tx.validate(),
            Err(TransactionError::MissingAccount { field: "fromAccountId", .. })
        ));
    }

    #[test]
    fn test_missing_id_rejected() {
        let tx = Transaction::new("ACC-A", "ACC-B", dec!(10), at(10))
            .unwrap()
            .with_id("");
        assert_eq!(tx.validate(), Err(TransactionError::MissingId));
    }

    #[test]
    fn test_batch_duplicate_ids() {
        let a = Transaction::new("ACC-A", "ACC-B", dec!(10), at(10))
            .unwrap()
            .with_id("TX-1");
        let b = a.clone();
        assert_eq!(
            validate_batch(&[a.clone(), b]),
            Err(TransactionError::DuplicateId("TX-1".to_string()))
        );
        assert!(validate_batch(&[a]).is_ok());
        assert!(validate_batch(&[]).is_ok());
    }

    #[test]
    fn test_involves() {
        let tx = Transaction::new("ACC-A", "ACC-B", dec!(10), at(10)).unwrap();
        assert!(tx.involves("ACC-A"));
        assert!(tx.involves("ACC-B"));
        assert!(!tx.involves("ACC-C"));
    }

    #[test]
    fn test_transaction_type_parse() {
        assert_eq!("deposit".parse::<TransactionType>().unwrap(), TransactionType::Deposit);
        assert_eq!(TransactionType::Withdrawal.to_string(), "WITHDRAWAL");
    }

    #[test]
    fn test_deserialize_ledger_record() {
        let json = r#"{
            "id": "TX-9",
            "amount": "9500",
            "fromAccountId": "ACC-1",
            "toAccountId": "ACC-2",
            "timestamp": "2024-03-04T03:00:00Z",
            "createdAt": "2024-03-04T03:00:05Z",
            "currency": "usd",
            "transactionType": "PAYMENT"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.amount.value(), dec!(9500));
        assert_eq!(tx.currency, Currency::Usd);
        assert_eq!(tx.transaction_type, TransactionType::Payment);

        let negative = json.replace("\"9500\"", "\"-9500\"");
        assert!(serde_json::from_str::<Transaction>(&negative).is_err());
    }
}
