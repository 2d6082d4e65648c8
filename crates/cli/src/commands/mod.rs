//! CLI subcommand implementations.

pub mod admin;
pub mod migrate;
pub mod product;

use sqlx::SqlitePool;

use gothic_shop_web::config::database_url_from_env;
use gothic_shop_web::db;

/// Connect to the shop database configured in the environment.
async fn connect() -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database...");
    db::create_pool(&database_url_from_env()).await
}
