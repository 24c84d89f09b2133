//! Transaction Model

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::LineItemInput;
use super::Product;

/// Ledger entry status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum TransactionStatus {
    Pending,
    #[default]
    Completed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger line, a snapshot of what was sold
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    pub id: i64,
    pub transaction_id: i64,
    pub product_id: i64,
    pub product_name: Option<String>,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

/// Completed sale
///
/// `user_id` is the acting user; `order_id` links back to the processed
/// order (at most one transaction per order).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: Option<i64>,
    pub order_id: Option<i64>,
    pub created_at: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: TransactionStatus,
    #[serde(default)]
    pub items: Vec<TransactionItem>,
}

/// Create transaction payload
///
/// `status` defaults to `Completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCreate {
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_completed() {
        assert_eq!(TransactionStatus::default(), TransactionStatus::Completed);
        let req: TransactionCreate =
            serde_json::from_str(r#"{"items":[{"productId":1,"quantity":1}]}"#).unwrap();
        assert_eq!(req.status.unwrap_or_default(), TransactionStatus::Completed);
    }

    #[test]
    fn test_transaction_serializes_camel_case() {
        let tx = Transaction {
            id: 1,
            user_id: Some(2),
            order_id: None,
            created_at: 0,
            total_amount: Decimal::new(700, 2),
            status: TransactionStatus::Completed,
            items: vec![],
        };
        let v = serde_json::to_value(&tx).unwrap();
        assert_eq!(v["userId"], 2);
        assert_eq!(v["totalAmount"].as_f64(), Some(7.0));
        assert_eq!(v["status"], "Completed");
    }
}
