//! Admin authentication service.
//!
//! Username and password login backed by Argon2id hashes. A successful login
//! yields the [`User`] that the route layer records in the session.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use tracing::instrument;

use gothic_shop_core::Username;

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Check a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown or
    /// malformed, or the password does not match.
    /// Returns `AuthError::Repository` if the lookup fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let Ok(username) = Username::parse(username.trim()) else {
            return Err(AuthError::InvalidCredentials);
        };

        let Some((user, password_hash)) = self.users.get_with_password_hash(&username).await?
        else {
            // Spend the same hashing effort as a real check.
            let _ = hash_password(password);
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Create a new admin account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn create_admin(
        &self,
        username: &Username,
        password: &SecretString,
    ) -> Result<User, AuthError> {
        validate_password(password.expose_secret())?;
        let password_hash = hash_password(password.expose_secret())?;

        self.users
            .create(username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Make sure the configured admin account exists.
    ///
    /// Returns `true` when the account was created by this call. An existing
    /// account is left untouched, password included.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if a new account would get a short password.
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn ensure_admin(
        &self,
        username: &Username,
        password: &SecretString,
    ) -> Result<bool, AuthError> {
        if self.users.get_by_username(username).await?.is_some() {
            return Ok(false);
        }

        match self.create_admin(username, password).await {
            Ok(user) => {
                tracing::info!(username = %user.username, "Created admin account");
                Ok(true)
            }
            // Lost a race with another process seeding the same account.
            Err(AuthError::UserAlreadyExists) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Replace an admin's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    pub async fn reset_password(
        &self,
        username: &Username,
        password: &SecretString,
    ) -> Result<(), AuthError> {
        validate_password(password.expose_secret())?;

        let user = self
            .users
            .get_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_hash = hash_password(password.expose_secret())?;
        self.users
            .update_password_hash(user.id, &password_hash)
            .await?;
        Ok(())
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
