//! # Repository Module
//!
//! Database repository implementations for Kasir POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Caller (kasir-cli)                                                    │
//! │       │                                                                 │
//! │       │  db.transactions().process_checkout(&items)                    │
//! │       ▼                                                                 │
//! │  TransactionRepository          ReportRepository                       │
//! │  ├── process_checkout           ├── daily_report                       │
//! │  ├── process_checkout_at        ├── report_for_day                     │
//! │  ├── get_by_id                  ├── range_report                       │
//! │  └── count                      └── report_for_window                  │
//! │       │                                │                                │
//! │       │  SQL                           │  SQL (read-only)               │
//! │       ▼                                ▼                                │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Each repository owns a pool clone. No shared mutable state.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Inventory store reads and seeding
//! - [`TransactionRepository`](transaction::TransactionRepository) - Checkout engine
//! - [`ReportRepository`](report::ReportRepository) - Report engine

pub mod product;
pub mod report;
pub mod transaction;
