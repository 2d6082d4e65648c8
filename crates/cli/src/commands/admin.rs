//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! shop-cli admin create -u keeper --password 'long secret'
//! SHOP_ADMIN_PASSWORD='long secret' shop-cli admin reset-password -u keeper
//! ```

use secrecy::SecretString;
use thiserror::Error;

use gothic_shop_core::Username;
use gothic_shop_web::db;
use gothic_shop_web::services::{AuthError, AuthService};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Neither `--password` nor the environment provided a password.
    #[error("No password given: pass --password or set SHOP_ADMIN_PASSWORD")]
    MissingPassword,

    /// Invalid username.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] gothic_shop_core::UsernameError),

    /// User already exists.
    #[error("Admin user already exists: {0}")]
    UserExists(String),

    /// No such user.
    #[error("No admin user named {0}")]
    UnknownUser(String),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Other authentication error (weak password, hashing, storage).
    #[error(transparent)]
    Auth(AuthError),
}

/// Create a new admin user.
pub async fn create_user(username: &str, password: Option<String>) -> Result<(), AdminError> {
    let username = Username::parse(username)?;
    let password = resolve_password(password)?;

    let pool = super::connect().await?;
    db::migrate(&pool).await?;

    tracing::info!("Creating admin user: {}", username);
    let user = AuthService::new(&pool)
        .create_admin(&username, &password)
        .await
        .map_err(|e| match e {
            AuthError::UserAlreadyExists => AdminError::UserExists(username.to_string()),
            other => AdminError::Auth(other),
        })?;

    tracing::info!("Admin user created successfully! ID: {}", user.id);
    Ok(())
}

/// Replace the password of an existing admin user.
pub async fn reset_password(username: &str, password: Option<String>) -> Result<(), AdminError> {
    let username = Username::parse(username)?;
    let password = resolve_password(password)?;

    let pool = super::connect().await?;

    AuthService::new(&pool)
        .reset_password(&username, &password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => AdminError::UnknownUser(username.to_string()),
            other => AdminError::Auth(other),
        })?;

    tracing::info!("Password updated for {}", username);
    Ok(())
}

/// Take the password from the flag, falling back to `SHOP_ADMIN_PASSWORD`.
fn resolve_password(flag: Option<String>) -> Result<SecretString, AdminError> {
    dotenvy::dotenv().ok();

    flag.or_else(|| std::env::var("SHOP_ADMIN_PASSWORD").ok())
        .filter(|p| !p.is_empty())
        .map(SecretString::from)
        .ok_or(AdminError::MissingPassword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_flag_password_wins() {
        let password = resolve_password(Some("from-the-flag".to_owned()));
        assert!(matches!(password, Ok(p) if p.expose_secret() == "from-the-flag"));
    }
}
