//! `kasir products`: lists the inventory store.

use crate::error::ApiError;
use kasir_core::Product;
use kasir_db::Database;

pub async fn list(db: &Database) -> Result<Vec<Product>, ApiError> {
    Ok(db.products().list().await?)
}
