//! # Validation Module
//!
//! Input validation for Kasir POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (kasir-cli)                                           │
//! │  └── Type validation (argument parsing)                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Empty checkout, non-positive quantities                           │
//! │  └── Runs before any storage access                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK (stock >= 0), CHECK (quantity > 0)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::validation::validate_checkout_items;
//! use kasir_core::CheckoutItem;
//!
//! assert!(validate_checkout_items(&[CheckoutItem::new(1, 2)]).is_ok());
//! assert!(validate_checkout_items(&[]).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{CheckoutItem, NewProduct};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates a checkout request.
///
/// ## Rules
/// - At least one item
/// - Every quantity > 0
///
/// Duplicate product ids are allowed; each line is decremented on its own.
pub fn validate_checkout_items(items: &[CheckoutItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    for item in items {
        validate_quantity(item.product_id, item.quantity)?;
    }

    Ok(())
}

/// Validates the quantity of a single checkout line.
pub fn validate_quantity(product_id: i64, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: format!("quantity for product {}", product_id),
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a product before it is stocked.
///
/// ## Rules
/// - Name must not be blank
/// - Price and stock must be non-negative (zero price = free item)
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    if product.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if product.price < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    if product.stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
