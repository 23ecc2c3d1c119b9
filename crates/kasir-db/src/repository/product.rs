//! # Product Repository
//!
//! Reads and seeding for the inventory store.
//!
//! Stock is only ever decremented by the checkout engine
//! ([`TransactionRepository`](super::transaction::TransactionRepository));
//! this repository never writes `stock` after a product is inserted.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::validation::validate_new_product;
use kasir_core::{CoreError, NewProduct, Product};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.insert(&NewProduct::new("BahleelOil", 9000, 20)).await?;
/// let same = repo.get_by_id(product.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, stock
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists every product ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, stock
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with its generated id
    /// * `Err(DbError::Domain(InvalidInput))` - Blank name, negative price or stock
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        validate_new_product(product).map_err(CoreError::from)?;

        debug!(name = %product.name, price = product.price, stock = product.stock, "Inserting product");

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, price, stock)
            VALUES (?1, ?2, ?3)
            RETURNING id
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(Product {
            id,
            name: product.name.clone(),
            price: product.price,
            stock: product.stock,
        })
    }

    /// Gets a product by ID, failing if it is missing.
    pub async fn require(&self, id: i64) -> DbResult<Product> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id.to_string()))
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use kasir_core::ErrorKind;

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let oil = repo.insert(&NewProduct::new("BahleelOil", 9000, 20)).await.unwrap();
        assert!(oil.id > 0);

        let fetched = repo.get_by_id(oil.id).await.unwrap().unwrap();
        assert_eq!(fetched, oil);
        assert_eq!(repo.require(oil.id).await.unwrap(), oil);

        assert!(repo.get_by_id(oil.id + 100).await.unwrap().is_none());
        let err = repo.require(oil.id + 100).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&NewProduct::new("Sarimie Istri 3", 6969, 69)).await.unwrap();
        repo.insert(&NewProduct::new("Minyak Jelantah", 1500, 15)).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Sarimie Istri 3", "Minyak Jelantah"]);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let err = repo.insert(&NewProduct::new("Oil", 100, -1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
