//! Session middleware configuration.
//!
//! Sessions live in memory and the cookie is signed with a key generated at
//! startup, so every restart logs all admins out.

use rand::RngCore;
use tower_sessions::cookie::{Key, SameSite, time::Duration};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::ShopConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "gothic_session";

/// Session expiry after inactivity (8 hours).
const SESSION_EXPIRY_SECONDS: i64 = 8 * 60 * 60;

/// Create the session layer with a fresh in-memory store and signing key.
#[must_use]
pub fn create_session_layer(config: &ShopConfig) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    let mut key_bytes = [0u8; 64];
    rand::rng().fill_bytes(&mut key_bytes);
    let key = Key::from(key_bytes.as_slice());

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(SESSION_EXPIRY_SECONDS)))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}
