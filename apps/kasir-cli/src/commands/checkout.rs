//! # Checkout Command
//!
//! `kasir checkout <PRODUCT_ID:QTY>...`
//!
//! Items are passed to the checkout engine in the order given. Repeated
//! product ids stay separate lines.

use tracing::info;

use crate::error::ApiError;
use kasir_core::{CheckoutItem, Transaction};
use kasir_db::Database;

/// Parses one `PRODUCT_ID:QTY` argument.
///
/// Only the shape is checked here; quantity rules belong to the engine.
pub fn parse_item(raw: &str) -> Result<CheckoutItem, ApiError> {
    let invalid = || ApiError::invalid_input(format!("Expected PRODUCT_ID:QTY, got {:?}", raw));

    let (id, qty) = raw.split_once(':').ok_or_else(invalid)?;
    let product_id = id.trim().parse::<i64>().map_err(|_| invalid())?;
    let quantity = qty.trim().parse::<i64>().map_err(|_| invalid())?;

    Ok(CheckoutItem::new(product_id, quantity))
}

/// Runs one checkout.
pub async fn run(db: &Database, raw_items: &[String]) -> Result<Transaction, ApiError> {
    let items = raw_items
        .iter()
        .map(|raw| parse_item(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let transaction = db.transactions().process_checkout(&items).await?;
    info!(id = transaction.id, total_amount = transaction.total_amount, "Checkout complete");

    Ok(transaction)
}
