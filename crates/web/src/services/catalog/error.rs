//! Catalog service error types.

use thiserror::Error;

use gothic_shop_core::ProductId;

use crate::db::RepositoryError;
use crate::services::assets::AssetError;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Input rejected before anything was written.
    #[error("{0}")]
    Validation(String),

    /// No product with this ID.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// Image storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] AssetError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),
}

impl CatalogError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
