//! # CLI Commands
//!
//! One module per command group. Each command borrows the open
//! [`Database`](kasir_db::Database), calls one engine, and returns a
//! serializable value or an [`ApiError`](crate::error::ApiError).
//!
//! ## Command Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kasir checkout 1:2 3:1             → checkout::run                    │
//! │  kasir report daily [--date D]      → report::daily                    │
//! │  kasir report range --start --end   → report::range                    │
//! │  kasir transaction <ID>             → transaction::show                │
//! │  kasir products                     → product::list                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod checkout;
pub mod product;
pub mod report;
pub mod transaction;
