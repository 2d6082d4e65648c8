//! Shop configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOP_ADMIN_PASSWORD` - Password for the seeded admin account (min 8 chars)
//!
//! ## Optional
//! - `SHOP_DATABASE_URL` - `SQLite` connection string (falls back to `DATABASE_URL`,
//!   then `sqlite://instance/gothic_shop.db`)
//! - `SHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOP_PORT` - Listen port (default: 5000)
//! - `SHOP_BASE_URL` - Public URL for the shop (default: <http://localhost:5000>)
//! - `SHOP_STATIC_DIR` - Static asset directory (default: static)
//! - `SHOP_PRODUCT_IMAGE_DIR` - Uploaded product images (default: static/images/products)
//! - `SHOP_MAX_UPLOAD_BYTES` - Request body limit (default: 16 MiB)
//! - `SHOP_ADMIN_USERNAME` - Seeded admin username (default: admin)
//! - `SHOP_CHAT_BASE_URL` - Order chat service base URL (default: <https://wa.me>)
//! - `SHOP_CHAT_PHONE` - Order chat phone number (default: 212632256568)
//! - `SHOP_CURRENCY` - Currency label used in order messages (default: MAD)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use gothic_shop_core::Username;

/// Default request body limit (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const DEFAULT_DATABASE_URL: &str = "sqlite://instance/gothic_shop.db";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shop application configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the shop
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Directory holding uploaded product images
    pub product_image_dir: PathBuf,
    /// Maximum request body size in bytes
    pub max_upload_bytes: usize,
    /// Seeded admin account
    pub admin: AdminSeedConfig,
    /// Order hand-off target
    pub order_chat: OrderChatConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Credentials for the admin account created at startup when absent.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminSeedConfig {
    pub username: Username,
    pub password: SecretString,
}

impl std::fmt::Debug for AdminSeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeedConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// External chat service that receives order requests.
#[derive(Debug, Clone)]
pub struct OrderChatConfig {
    /// Base URL of the chat service (e.g., <https://wa.me>)
    pub base_url: Url,
    /// Phone number appended to the base URL
    pub phone: String,
    /// Currency label shown next to prices in the message
    pub currency: String,
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SHOP_DATABASE_URL");
        let host = parse_env("SHOP_HOST", "127.0.0.1")?;
        let port = parse_env("SHOP_PORT", "5000")?;
        let base_url = get_env_or_default("SHOP_BASE_URL", "http://localhost:5000");
        let static_dir = PathBuf::from(get_env_or_default("SHOP_STATIC_DIR", "static"));
        let product_image_dir = PathBuf::from(get_env_or_default(
            "SHOP_PRODUCT_IMAGE_DIR",
            "static/images/products",
        ));
        let max_upload_bytes = parse_env(
            "SHOP_MAX_UPLOAD_BYTES",
            &DEFAULT_MAX_UPLOAD_BYTES.to_string(),
        )?;

        let admin = AdminSeedConfig::from_env()?;
        let order_chat = OrderChatConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            static_dir,
            product_image_dir,
            max_upload_bytes,
            admin,
            order_chat,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl AdminSeedConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_username = get_env_or_default("SHOP_ADMIN_USERNAME", "admin");
        let username = Username::parse(&raw_username).map_err(|e| {
            ConfigError::InvalidEnvVar("SHOP_ADMIN_USERNAME".to_string(), e.to_string())
        })?;
        let password = SecretString::from(get_required_env("SHOP_ADMIN_PASSWORD")?);

        Ok(Self { username, password })
    }
}

impl OrderChatConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = Url::parse(&get_env_or_default("SHOP_CHAT_BASE_URL", "https://wa.me"))
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOP_CHAT_BASE_URL".to_string(), e.to_string())
            })?;

        let phone = get_env_or_default("SHOP_CHAT_PHONE", "212632256568");
        validate_phone(&phone)?;

        Ok(Self {
            base_url,
            phone,
            currency: get_env_or_default("SHOP_CURRENCY", "MAD"),
        })
    }
}

/// Database URL from the environment alone, for tools that need nothing else.
#[must_use]
pub fn database_url_from_env() -> SecretString {
    let _ = dotenvy::dotenv();
    get_database_url("SHOP_DATABASE_URL")
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`, then the local file.
fn get_database_url(primary_key: &str) -> SecretString {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_or_else(
            |_| SecretString::from(DEFAULT_DATABASE_URL),
            SecretString::from,
        )
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// The chat service expects digits only (international format, no `+`).
fn validate_phone(phone: &str) -> Result<(), ConfigError> {
    if phone.is_empty() || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            "SHOP_CHAT_PHONE".to_string(),
            "must contain digits only".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ShopConfig {
        ShopConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            static_dir: PathBuf::from("static"),
            product_image_dir: PathBuf::from("static/images/products"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            admin: AdminSeedConfig {
                username: Username::parse("admin").unwrap(),
                password: SecretString::from("super_secret_admin_password"),
            },
            order_chat: OrderChatConfig {
                base_url: Url::parse("https://wa.me").unwrap(),
                phone: "212632256568".to_string(),
                currency: "MAD".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_is_secure() {
        let mut config = test_config();
        assert!(!config.is_secure());
        config.base_url = "https://shop.example".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_default_upload_limit_is_16_mib() {
        assert_eq!(DEFAULT_MAX_UPLOAD_BYTES, 16_777_216);
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("212632256568").is_ok());
        assert!(validate_phone("+212632256568").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_admin_seed_debug_redacts_password() {
        let debug_output = format!("{:?}", test_config().admin);
        assert!(debug_output.contains("admin"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_admin_password"));
    }
}
