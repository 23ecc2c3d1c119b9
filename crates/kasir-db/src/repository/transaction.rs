//! # Transaction Repository (Checkout Engine)
//!
//! Converts a list of checkout items into one committed transaction, or
//! nothing at all.
//!
//! ## Checkout Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       process_checkout(items)                           │
//! │                                                                         │
//! │  validate items ──✗──► InvalidInput (no storage access)                │
//! │       │                                                                 │
//! │  BEGIN                                                                  │
//! │       │                                                                 │
//! │  for each item, in input order:                                        │
//! │     UPDATE products SET stock = stock - qty                            │
//! │      WHERE id = ? AND stock >= qty RETURNING name, price               │
//! │       ├── row    → draft.add_line(name, price, qty)                    │
//! │       └── no row → SELECT stock WHERE id = ?                           │
//! │                     ├── missing → ProductNotFound    ──► ROLLBACK      │
//! │                     └── present → InsufficientStock  ──► ROLLBACK      │
//! │       │                                                                 │
//! │  INSERT transactions (total_amount, created_at) RETURNING id           │
//! │  INSERT transaction_details × n (tagged with id)                       │
//! │       │                                                                 │
//! │  COMMIT ──► Transaction                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The decrement and its stock check are one statement. Two checkouts racing
//! for the last units serialize on SQLite's writer lock; the loser's
//! `stock >= qty` condition fails once the winner commits.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use kasir_core::validation::validate_checkout_items;
use kasir_core::{CheckoutDraft, CheckoutItem, CoreError, Money, Transaction, TransactionDetail};

/// Repository for the transaction ledger.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Runs a checkout stamped with the current time.
    ///
    /// ## Errors
    /// * `InvalidInput` - empty list, non-positive quantity, or amount overflow
    /// * `ProductNotFound` - an item names an unknown product
    /// * `InsufficientStock` - an item asks for more than is left
    /// * storage variants - anything SQLite reports unexpectedly
    ///
    /// Every error leaves stock and the ledger exactly as they were.
    pub async fn process_checkout(&self, items: &[CheckoutItem]) -> DbResult<Transaction> {
        self.process_checkout_at(items, Utc::now()).await
    }

    /// Runs a checkout whose ledger row is stamped `at`.
    pub async fn process_checkout_at(
        &self,
        items: &[CheckoutItem],
        at: DateTime<Utc>,
    ) -> DbResult<Transaction> {
        validate_checkout_items(items).map_err(CoreError::from)?;

        debug!(lines = items.len(), "Starting checkout");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        match run_checkout(&mut tx, items, at).await {
            Ok(transaction) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

                info!(
                    id = transaction.id,
                    total_amount = transaction.total_amount,
                    lines = transaction.details.len(),
                    "Checkout committed"
                );
                Ok(transaction)
            }
            Err(err) => {
                warn!(error = %err, "Checkout rolled back");
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Gets a committed transaction with its details in insertion order.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, total_amount, created_at
            FROM transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut transaction) = transaction else {
            return Ok(None);
        };

        transaction.details = sqlx::query_as::<_, TransactionDetail>(
            r#"
            SELECT transaction_id, product_id, product_name, quantity, subtotal
            FROM transaction_details
            WHERE transaction_id = ?1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(transaction))
    }

    /// Counts committed transactions (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit of Work
// =============================================================================

/// Every statement of one checkout, run on the open transaction.
async fn run_checkout(
    conn: &mut SqliteConnection,
    items: &[CheckoutItem],
    at: DateTime<Utc>,
) -> DbResult<Transaction> {
    let mut draft = CheckoutDraft::with_capacity(items.len());

    for item in items {
        let sold: Option<(String, i64)> = sqlx::query_as(
            r#"
            UPDATE products
            SET stock = stock - ?1
            WHERE id = ?2 AND stock >= ?1
            RETURNING name, price
            "#,
        )
        .bind(item.quantity)
        .bind(item.product_id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some((name, price)) = sold else {
            return Err(stock_failure(conn, item).await);
        };

        debug!(product_id = item.product_id, quantity = item.quantity, "Stock decremented");
        draft.add_line(item.product_id, name, Money::from_minor(price), item.quantity)?;
    }

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO transactions (total_amount, created_at)
        VALUES (?1, ?2)
        RETURNING id
        "#,
    )
    .bind(draft.total().minor())
    .bind(at)
    .fetch_one(&mut *conn)
    .await?;

    debug!(id, total_amount = draft.total().minor(), "Ledger row inserted");

    for detail in draft.details() {
        sqlx::query(
            r#"
            INSERT INTO transaction_details (
                transaction_id, product_id, product_name, quantity, subtotal
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(id)
        .bind(detail.product_id)
        .bind(&detail.product_name)
        .bind(detail.quantity)
        .bind(detail.subtotal)
        .execute(&mut *conn)
        .await?;
    }

    Ok(draft.into_transaction(id, at))
}

/// Explains why a conditional decrement matched no row.
async fn stock_failure(conn: &mut SqliteConnection, item: &CheckoutItem) -> DbError {
    let available: Option<i64> = match sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
        .bind(item.product_id)
        .fetch_optional(&mut *conn)
        .await
    {
        Ok(available) => available,
        Err(err) => return err.into(),
    };

    match available {
        None => CoreError::ProductNotFound(item.product_id).into(),
        Some(available) => CoreError::InsufficientStock {
            product_id: item.product_id,
            available,
            requested: item.quantity,
        }
        .into(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;
    use kasir_core::{ErrorKind, NewProduct};

    /// Database stocked with three products (ids 1, 2, 3).
    async fn stocked_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let products = db.products();
        products.insert(&NewProduct::new("Sarimie Istri 3", 6969, 69)).await.unwrap();
        products.insert(&NewProduct::new("BahleelOil", 9000, 20)).await.unwrap();
        products.insert(&NewProduct::new("Minyak Jelantah", 1500, 15)).await.unwrap();
        db
    }

    async fn stock_of(db: &Database, id: i64) -> i64 {
        db.products().require(id).await.unwrap().stock
    }

    async fn detail_rows(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM transaction_details")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_checkout_totals_and_stock() {
        let db = stocked_db().await;
        let repo = db.transactions();

        let txn = repo
            .process_checkout_at(&[CheckoutItem::new(1, 2), CheckoutItem::new(3, 4)], at(9))
            .await
            .unwrap();

        assert_eq!(txn.total_amount, 6969 * 2 + 1500 * 4);
        assert_eq!(txn.details_total(), txn.total());
        assert_eq!(txn.created_at, at(9));
        assert_eq!(txn.details.len(), 2);
        assert_eq!(txn.details[0].product_name, "Sarimie Istri 3");
        assert_eq!(txn.details[0].subtotal, 13938);
        assert_eq!(txn.details[1].product_id, 3);
        assert!(txn.details.iter().all(|d| d.transaction_id == txn.id));

        assert_eq!(stock_of(&db, 1).await, 67);
        assert_eq!(stock_of(&db, 2).await, 20);
        assert_eq!(stock_of(&db, 3).await, 11);

        let stored = repo.get_by_id(txn.id).await.unwrap().unwrap();
        assert_eq!(stored, txn);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_touches_nothing() {
        let db = stocked_db().await;
        let repo = db.transactions();

        let err = repo.process_checkout(&[]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = repo
            .process_checkout(&[CheckoutItem::new(1, 1), CheckoutItem::new(2, 0)])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = repo
            .process_checkout(&[CheckoutItem::new(3, -2)])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        assert_eq!(stock_of(&db, 1).await, 69);
        assert_eq!(stock_of(&db, 2).await, 20);
        assert_eq!(stock_of(&db, 3).await, 15);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back_earlier_lines() {
        let db = stocked_db().await;
        let repo = db.transactions();

        let err = repo
            .process_checkout(&[CheckoutItem::new(1, 2), CheckoutItem::new(999, 1)])
            .await
            .unwrap_err();

        assert_eq!(err.as_domain(), Some(&CoreError::ProductNotFound(999)));
        assert_eq!(stock_of(&db, 1).await, 69);
        assert_eq!(repo.count().await.unwrap(), 0);
        assert_eq!(detail_rows(&db).await, 0);
    }

    #[tokio::test]
    async fn test_insufficient_stock_reports_available() {
        let db = stocked_db().await;
        let repo = db.transactions();

        let err = repo
            .process_checkout(&[CheckoutItem::new(3, 1), CheckoutItem::new(2, 21)])
            .await
            .unwrap_err();

        assert_eq!(
            err.as_domain(),
            Some(&CoreError::InsufficientStock {
                product_id: 2,
                available: 20,
                requested: 21,
            })
        );
        assert_eq!(stock_of(&db, 2).await, 20);
        assert_eq!(stock_of(&db, 3).await, 15);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_repeated_product_lines_share_stock() {
        let db = stocked_db().await;
        let repo = db.transactions();

        // 10 + 6 > 15: the second line sees what the first one left
        let err = repo
            .process_checkout(&[CheckoutItem::new(3, 10), CheckoutItem::new(3, 6)])
            .await
            .unwrap_err();
        assert_eq!(
            err.as_domain(),
            Some(&CoreError::InsufficientStock {
                product_id: 3,
                available: 5,
                requested: 6,
            })
        );
        assert_eq!(stock_of(&db, 3).await, 15);

        let txn = repo
            .process_checkout(&[CheckoutItem::new(3, 10), CheckoutItem::new(3, 5)])
            .await
            .unwrap();
        assert_eq!(txn.details.len(), 2);
        assert_eq!(txn.total_amount, 1500 * 15);
        assert_eq!(stock_of(&db, 3).await, 0);
    }

    #[tokio::test]
    async fn test_details_are_price_snapshots() {
        let db = stocked_db().await;
        let repo = db.transactions();

        let txn = repo
            .process_checkout_at(&[CheckoutItem::new(2, 3)], at(10))
            .await
            .unwrap();

        sqlx::query("UPDATE products SET name = 'Renamed Oil', price = 1 WHERE id = 2")
            .execute(db.pool())
            .await
            .unwrap();

        let stored = repo.get_by_id(txn.id).await.unwrap().unwrap();
        assert_eq!(stored.details[0].product_name, "BahleelOil");
        assert_eq!(stored.details[0].subtotal, 27000);
        assert_eq!(stored.total_amount, 27000);
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let db = stocked_db().await;
        assert!(db.transactions().get_by_id(42).await.unwrap().is_none());
    }
}
