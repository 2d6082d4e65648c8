//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;

use crate::config::ShopConfig;
use crate::db;
use crate::services::{AssetError, AuthError, AuthService, ImageStore};

/// Errors that can occur while preparing the application state.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to create directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to prepare image directory: {0}")]
    Asset(#[from] AssetError),
    #[error("failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("failed to seed admin account: {0}")]
    SeedAdmin(#[from] AuthError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ShopConfig,
    pool: SqlitePool,
    images: ImageStore,
}

impl AppState {
    /// Prepare everything the server needs.
    ///
    /// Creates the static and image directories (and the parent directory of
    /// a file-backed database), connects, applies migrations and seeds the
    /// configured admin account when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StartupError` if any of those steps fails.
    pub async fn initialize(config: ShopConfig) -> Result<Self, StartupError> {
        ensure_database_dir(&config)?;
        tokio::fs::create_dir_all(&config.static_dir).await?;

        let images = ImageStore::new(&config.product_image_dir);
        images.ensure_dir().await?;

        let pool = db::create_pool(&config.database_url).await?;
        db::migrate(&pool).await?;
        tracing::info!("Database migrations applied");

        AuthService::new(&pool)
            .ensure_admin(&config.admin.username, &config.admin.password)
            .await?;

        Ok(Self::new(config, pool, images))
    }

    /// Assemble state from already prepared parts.
    #[must_use]
    pub fn new(config: ShopConfig, pool: SqlitePool, images: ImageStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                images,
            }),
        }
    }

    /// Get a reference to the shop configuration.
    #[must_use]
    pub fn config(&self) -> &ShopConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the product image store.
    #[must_use]
    pub fn images(&self) -> &ImageStore {
        &self.inner.images
    }
}

/// Create the directory holding a file-backed `SQLite` database.
fn ensure_database_dir(config: &ShopConfig) -> std::io::Result<()> {
    use secrecy::ExposeSecret;

    let url = config.database_url.expose_secret();
    let Some(path) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }

    match std::path::Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
