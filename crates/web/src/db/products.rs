//! Product repository for database operations.
//!
//! Queries use the runtime-checked `sqlx::query_as` API with explicit row
//! types; rows are converted into domain [`Product`]s and any value that fails
//! domain validation is reported as `DataCorruption`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use gothic_shop_core::{ImageList, Price, ProductId};

use super::RepositoryError;
use crate::models::{NewProduct, Product};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, images, category, in_stock, created_at";

/// Raw `product` row.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: String,
    images: String,
    category: String,
    in_stock: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::parse(&row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid price {:?} for product {}: {e}",
                row.price, row.id
            ))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price,
            images: ImageList::decode(&row.images),
            category: row.category,
            in_stock: row.in_stock,
            created_at: row.created_at,
        })
    }
}

/// Product totals shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductCounts {
    pub total: i64,
    pub in_stock: i64,
    pub categories: i64,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new product. It is always created in stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO product (name, description, price, images, category, in_stock, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.to_string())
        .bind(product.images.encode())
        .bind(&product.category)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored price is invalid.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?1"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// List every product, newest first (admin views).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// List in-stock products, newest first.
    ///
    /// # Arguments
    ///
    /// * `category` - Exact category to match, or `None` for all categories
    /// * `limit` - Maximum number of rows, or `None` for no limit
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_in_stock(
        &self,
        category: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Product>, RepositoryError> {
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map_or(-1, i64::from);

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM product
            WHERE in_stock = 1 AND (?1 IS NULL OR category = ?1)
            ORDER BY created_at DESC, id DESC
            LIMIT ?2
            "
        ))
        .bind(category)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// List the distinct category labels across all products, sorted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<String>, RepositoryError> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM product ORDER BY category",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Count products for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn counts(&self) -> Result<ProductCounts, RepositoryError> {
        let (total, in_stock, categories) = sqlx::query_as::<_, (i64, i64, i64)>(
            r"
            SELECT COUNT(*),
                   COALESCE(SUM(in_stock), 0),
                   COUNT(DISTINCT category)
            FROM product
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(ProductCounts {
            total,
            in_stock,
            categories,
        })
    }

    /// Update the availability flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_in_stock(&self, id: ProductId, in_stock: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE product SET in_stock = ?1 WHERE id = ?2")
            .bind(in_stock)
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a product record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was deleted (already gone).
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = ?1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::TestDb;

    fn new_product(name: &str, category: &str) -> NewProduct {
        let mut images = ImageList::new();
        images.push(format!("{name}_front.png").replace(' ', "_")).unwrap();
        NewProduct {
            name: name.to_owned(),
            description: "Hand stitched".to_owned(),
            price: Price::parse("450").unwrap(),
            images,
            category: category.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = TestDb::new().await;
        let repo = ProductRepository::new(db.pool());

        let created = repo.create(&new_product("Raven Cloak", "Cloaks")).await.unwrap();
        assert!(created.in_stock);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.images.len(), 1);
        assert_eq!(fetched.price.to_string(), "450");
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = TestDb::new().await;
        let repo = ProductRepository::new(db.pool());
        assert!(repo.get_by_id(ProductId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_in_stock_filters_and_limits() {
        let db = TestDb::new().await;
        let repo = ProductRepository::new(db.pool());

        let a = repo.create(&new_product("A", "Cloaks")).await.unwrap();
        let b = repo.create(&new_product("B", "Rings")).await.unwrap();
        let c = repo.create(&new_product("C", "Cloaks")).await.unwrap();
        repo.set_in_stock(c.id, false).await.unwrap();

        let all = repo.list_in_stock(None, None).await.unwrap();
        let ids: Vec<ProductId> = all.iter().map(|p| p.id).collect();
        assert_eq!(ids, [b.id, a.id]);

        let cloaks = repo.list_in_stock(Some("Cloaks"), None).await.unwrap();
        assert_eq!(cloaks.len(), 1);
        assert_eq!(cloaks[0].id, a.id);

        let limited = repo.list_in_stock(None, Some(1)).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, b.id);
    }

    #[tokio::test]
    async fn test_list_categories_is_distinct() {
        let db = TestDb::new().await;
        let repo = ProductRepository::new(db.pool());

        repo.create(&new_product("A", "Rings")).await.unwrap();
        repo.create(&new_product("B", "Cloaks")).await.unwrap();
        let c = repo.create(&new_product("C", "Rings")).await.unwrap();
        repo.set_in_stock(c.id, false).await.unwrap();

        assert_eq!(repo.list_categories().await.unwrap(), ["Cloaks", "Rings"]);
    }

    #[tokio::test]
    async fn test_counts() {
        let db = TestDb::new().await;
        let repo = ProductRepository::new(db.pool());
        assert_eq!(repo.counts().await.unwrap(), ProductCounts::default());

        repo.create(&new_product("A", "Rings")).await.unwrap();
        let b = repo.create(&new_product("B", "Cloaks")).await.unwrap();
        repo.set_in_stock(b.id, false).await.unwrap();

        let counts = repo.counts().await.unwrap();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.in_stock, 1);
        assert_eq!(counts.categories, 2);
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let db = TestDb::new().await;
        let repo = ProductRepository::new(db.pool());

        let created = repo.create(&new_product("A", "Rings")).await.unwrap();
        repo.delete(created.id).await.unwrap();
        assert!(matches!(
            repo.delete(created.id).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_in_stock_missing() {
        let db = TestDb::new().await;
        let repo = ProductRepository::new(db.pool());
        assert!(matches!(
            repo.set_in_stock(ProductId::new(1), false).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
