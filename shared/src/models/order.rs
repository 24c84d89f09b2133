//! Order Model

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// Order lifecycle status
///
/// `Pending → Completed` (process) and `Pending → Voided` (void);
/// `Completed` and `Voided` are terminal. Legacy console values
/// `Approved` and `Cancelled` are accepted on input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum OrderStatus {
    #[default]
    Pending,
    #[serde(alias = "Approved")]
    Completed,
    #[serde(alias = "Cancelled")]
    Voided,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Voided => "Voided",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Completed) | (Self::Pending, Self::Voided)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order line
///
/// `product_name` and `unit_price` are snapshots taken at creation;
/// `product` is the current catalog entry, attached on read for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
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

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub created_at: i64,
    pub table_number: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_by: Option<i64>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Submitted line (orders and transactions)
///
/// `unit_price` is only honoured under the client pricing policy;
/// `total_price`, when given, must equal the recomputed line total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub product_id: i64,
    pub quantity: i32,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub unit_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_price: Option<Decimal>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub table_number: i32,
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
}
