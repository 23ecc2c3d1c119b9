//! # Transaction Command
//!
//! `kasir transaction <ID>`: prints one committed transaction with its
//! details.

use crate::error::ApiError;
use kasir_core::Transaction;
use kasir_db::Database;

pub async fn show(db: &Database, id: i64) -> Result<Transaction, ApiError> {
    db.transactions()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction", &id.to_string()))
}
