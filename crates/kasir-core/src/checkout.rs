//! # Checkout Draft
//!
//! The in-memory side of a checkout: priced lines buffered while the
//! database unit of work is still open.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Draft Lifecycle                          │
//! │                                                                         │
//! │  for each item (input order):                                          │
//! │     stock decremented in DB, returns (name, price)                     │
//! │        └── add_line() → subtotal = price × qty, total += subtotal      │
//! │                                                                         │
//! │  ledger row inserted with total() → generated id                       │
//! │        └── into_transaction(id, created_at) → details tagged with id   │
//! │                                                                         │
//! │  details inserted, unit of work committed                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Transaction, TransactionDetail};

/// Priced lines of a checkout that has not been committed yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutDraft {
    total: Money,
    details: Vec<TransactionDetail>,
}

impl CheckoutDraft {
    /// Creates an empty draft sized for `lines` items.
    pub fn with_capacity(lines: usize) -> Self {
        CheckoutDraft {
            total: Money::zero(),
            details: Vec::with_capacity(lines),
        }
    }

    /// Buffers one line priced at the snapshotted unit price.
    ///
    /// Fails with `InvalidInput` if the subtotal or the running total
    /// overflows.
    pub fn add_line(
        &mut self,
        product_id: i64,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> CoreResult<&TransactionDetail> {
        let subtotal = unit_price
            .checked_multiply_quantity(quantity)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: format!("subtotal for product {}", product_id),
                min: 0,
                max: i64::MAX,
            })?;

        self.total = self
            .total
            .checked_add(subtotal)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "total_amount".to_string(),
                min: 0,
                max: i64::MAX,
            })?;

        self.details.push(TransactionDetail {
            transaction_id: 0,
            product_id,
            product_name: product_name.into(),
            quantity,
            subtotal: subtotal.minor(),
        });

        // Just pushed
        Ok(&self.details[self.details.len() - 1])
    }

    /// Running total of all buffered subtotals.
    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn details(&self) -> &[TransactionDetail] {
        &self.details
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// Finishes the draft once the ledger row exists.
    pub fn into_transaction(self, id: i64, created_at: DateTime<Utc>) -> Transaction {
        let details = self
            .details
            .into_iter()
            .map(|mut d| {
                d.transaction_id = id;
                d
            })
            .collect();

        Transaction {
            id,
            total_amount: self.total.minor(),
            created_at,
            details,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
