//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasir-core errors (this file)                                         │
//! │  ├── CoreError        - Checkout / report domain failures              │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ErrorKind        - Machine-readable code for every failure        │
//! │                                                                         │
//! │  kasir-db errors (separate crate)                                      │
//! │  └── DbError          - Storage failures + wrapped CoreError           │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → caller       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, stock, date string)
//! 3. Errors are enum variants, never String
//! 4. Every variant maps to exactly one [`ErrorKind`]

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// The failure taxonomy shared by every layer.
///
/// `StorageFailure` never originates in this crate; it is produced by the
/// database layer for anything the store reports unexpectedly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidInput,
    ProductNotFound,
    InsufficientStock,
    InvalidDateFormat,
    InvalidDateRange,
    NoTransactions,
    StorageFailure,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every checkout failure listed here implies the unit of work was rolled
/// back: no stock was deducted and no ledger row was written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Checkout input rejected before any storage access.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Product id does not exist in the inventory store.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Insufficient stock to complete the checkout.
    ///
    /// ## User Workflow
    /// ```text
    /// checkout [{product_id: 3, quantity: 5}]
    ///      │
    ///      ▼
    /// conditional decrement matches no row
    ///      │
    ///      ▼
    /// re-read product 3: stock = 2
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 3, available: 2, requested: 5 }
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Input string matched none of the accepted date formats.
    #[error("Invalid date format: {input:?}")]
    InvalidDateFormat { input: String },

    /// Report range whose end is not strictly after its start.
    #[error("Invalid date range: end ({end}) must be after start ({start})")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Report window contains no committed transactions.
    #[error("No transactions between {start} and {end}")]
    NoTransactions { start: NaiveDate, end: NaiveDate },
}

impl CoreError {
    /// Returns the machine-readable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidInput(_) => ErrorKind::InvalidInput,
            CoreError::ProductNotFound(_) => ErrorKind::ProductNotFound,
            CoreError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            CoreError::InvalidDateFormat { .. } => ErrorKind::InvalidDateFormat,
            CoreError::InvalidDateRange { .. } => ErrorKind::InvalidDateRange,
            CoreError::NoTransactions { .. } => ErrorKind::NoTransactions,
        }
    }

    /// Creates an InvalidDateFormat error for the offending input.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        CoreError::InvalidDateFormat {
            input: input.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before any storage access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
