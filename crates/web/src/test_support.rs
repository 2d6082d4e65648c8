//! Helpers shared by unit tests.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// A migrated `SQLite` database in a temporary directory.
pub struct TestDb {
    pool: SqlitePool,
    _dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("shop.db").display());
        let pool = crate::db::create_pool(&SecretString::from(url)).await.unwrap();
        crate::db::migrate(&pool).await.unwrap();
        Self { pool, _dir: dir }
    }

    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
