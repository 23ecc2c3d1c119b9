//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │    Product      │   │  CheckoutItem   │   │     Transaction      │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  id             │   │  product_id     │   │  id                  │  │
//! │  │  name           │   │  quantity       │   │  total_amount        │  │
//! │  │  price          │   └─────────────────┘   │  created_at          │  │
//! │  │  stock          │                         │  details[] ──────┐   │  │
//! │  └─────────────────┘                         └──────────────────┼───┘  │
//! │                                                                 ▼      │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │     Report      │   │   TopProduct    │   │  TransactionDetail   │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  total_revenue  │──►│  product_name   │   │  product_name (snap) │  │
//! │  │  total_txns     │   │  quantity_sold  │   │  quantity, subtotal  │  │
//! │  └─────────────────┘   └─────────────────┘   └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `TransactionDetail` copies the product name and the price in effect at
//! the moment of sale. Reports read the snapshot, never the live catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the inventory store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Store-generated identifier.
    pub id: i64,

    /// Display name, snapshotted into every sale.
    pub name: String,

    /// Price in the smallest currency unit.
    pub price: i64,

    /// Units on hand. Never negative.
    pub stock: i64,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price)
    }

    /// Checks if the requested quantity can be taken from stock.
    pub fn can_fulfil(&self, quantity: i64) -> bool {
        quantity > 0 && self.stock >= quantity
    }
}

/// Input for stocking a new product (seeding and tests).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: i64, stock: i64) -> Self {
        NewProduct {
            name: name.into(),
            price,
            stock,
        }
    }
}

// =============================================================================
// Checkout Item
// =============================================================================

/// One requested line of a checkout. Ephemeral: never persisted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i64,
}

impl CheckoutItem {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        CheckoutItem {
            product_id,
            quantity,
        }
    }
}

// =============================================================================
// Transaction Detail
// =============================================================================

/// A line of a committed transaction.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionDetail {
    /// Parent transaction. Zero until the ledger row has been inserted.
    pub transaction_id: i64,
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Unit price at time of sale × quantity.
    pub subtotal: i64,
}

impl TransactionDetail {
    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_minor(self.subtotal)
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A committed checkout: one ledger row plus its details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: i64,
    /// Sum of all detail subtotals.
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
    /// Details in checkout input order.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub details: Vec<TransactionDetail>,
}

impl Transaction {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_minor(self.total_amount)
    }

    /// Recomputes the total from the details.
    ///
    /// For a committed transaction this always equals [`Transaction::total`].
    pub fn details_total(&self) -> Money {
        self.details.iter().map(TransactionDetail::subtotal).sum()
    }
}

// =============================================================================
// Report
// =============================================================================

/// Best-selling product of a report window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProduct {
    pub product_name: String,
    pub quantity_sold: i64,
}

/// Aggregate over a report window. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub total_revenue: i64,
    pub total_transactions: i64,
    pub top_product: TopProduct,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(product_id: i64, name: &str, quantity: i64, subtotal: i64) -> TransactionDetail {
        TransactionDetail {
            transaction_id: 7,
            product_id,
            product_name: name.to_string(),
            quantity,
            subtotal,
        }
    }

    #[test]
    fn test_product_can_fulfil() {
        let product = Product {
            id: 1,
            name: "BahleelOil".to_string(),
            price: 9000,
            stock: 20,
        };
        assert!(product.can_fulfil(20));
        assert!(!product.can_fulfil(21));
        assert!(!product.can_fulfil(0));
        assert_eq!(product.price().minor(), 9000);
    }

    #[test]
    fn test_details_total_matches_total() {
        let txn = Transaction {
            id: 7,
            total_amount: 22500,
            created_at: Utc::now(),
            details: vec![
                detail(2, "BahleelOil", 2, 18000),
                detail(3, "Minyak Jelantah", 3, 4500),
            ],
        };
        assert_eq!(txn.details_total(), txn.total());
    }

    #[test]
    fn test_report_json_shape() {
        let report = Report {
            total_revenue: 45000,
            total_transactions: 3,
            top_product: TopProduct {
                product_name: "Sarimie Istri 3".to_string(),
                quantity_sold: 12,
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_revenue"], 45000);
        assert_eq!(json["total_transactions"], 3);
        assert_eq!(json["top_product"]["product_name"], "Sarimie Istri 3");
        assert_eq!(json["top_product"]["quantity_sold"], 12);
    }
}
