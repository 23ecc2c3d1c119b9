//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate holds the domain model of the Kasir point-of-sale backend:
//! everything that can be computed without touching the database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    External caller (kasir-cli)                  │   │
//! │  │        checkout 1:2 3:1      report daily / report range        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   dates   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  parser   │  │ checkout  │  │   │
//! │  │   │  Report   │  │           │  │ DateWindow│  │   items   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kasir-db (Database Layer)                    │   │
//! │  │        Checkout engine, report engine, migrations               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Transaction, Report, etc.)
//! - [`checkout`] - Priced lines buffered during a checkout
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`dates`] - Date/range parser and half-open report windows
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Checkout input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::dates::DateParser;
//!
//! let parser = DateParser::utc();
//! let start = parser.parse("2024-01-15").unwrap();
//! let end = parser.parse("2024-01-15 23:59:59").unwrap();
//! assert!(end > start);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod dates;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::CheckoutDraft;
pub use dates::{normalize_end_of_day, DateParser, DateWindow};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use types::*;
