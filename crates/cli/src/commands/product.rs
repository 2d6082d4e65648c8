//! Product management commands.
//!
//! # Usage
//!
//! ```bash
//! shop-cli product set-stock 12 --in-stock false
//! ```

use thiserror::Error;

use gothic_shop_core::ProductId;
use gothic_shop_web::db::{ProductRepository, RepositoryError};

/// Errors that can occur during product operations.
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product {0} not found")]
    NotFound(ProductId),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

/// Set the availability flag of a product.
pub async fn set_stock(id: i64, in_stock: bool) -> Result<(), ProductError> {
    let id = ProductId::new(id);
    let pool = super::connect().await?;

    ProductRepository::new(&pool)
        .set_in_stock(id, in_stock)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ProductError::NotFound(id),
            other => ProductError::Repository(other),
        })?;

    tracing::info!(
        "Product {} is now {}",
        id,
        if in_stock { "in stock" } else { "out of stock" }
    );
    Ok(())
}
