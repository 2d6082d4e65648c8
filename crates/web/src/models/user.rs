//! Admin user domain types.

use chrono::{DateTime, Utc};

use gothic_shop_core::{UserId, Username};

/// An admin account (domain type).
///
/// The password hash is deliberately not part of this type; it is only read
/// by the repository method used for login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: Username,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
