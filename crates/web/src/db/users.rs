//! Admin user repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use gothic_shop_core::{UserId, Username};

use super::RepositoryError;
use crate::models::User;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            username,
            created_at: row.created_at,
        })
    }
}

/// Row carrying the password hash, only read during login.
#[derive(Debug, sqlx::FromRow)]
struct UserCredentialsRow {
    id: i64,
    username: String,
    created_at: DateTime<Utc>,
    password_hash: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for admin user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored username is invalid.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, created_at
            FROM "user"
            WHERE username = ?1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a user together with their stored password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored username is invalid.
    pub async fn get_with_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserCredentialsRow>(
            r#"
            SELECT id, username, created_at, password_hash
            FROM "user"
            WHERE username = ?1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|row| {
            let user = User::try_from(UserRow {
                id: row.id,
                username: row.username,
                created_at: row.created_at,
            })?;
            Ok((user, row.password_hash))
        })
        .transpose()
    }

    /// Create a new admin user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO "user" (username, password_hash, created_at)
            VALUES (?1, ?2, ?3)
            RETURNING id, username, created_at
            "#,
        )
        .bind(username.as_str())
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(r#"UPDATE "user" SET password_hash = ?1 WHERE id = ?2"#)
            .bind(password_hash)
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::TestDb;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let db = TestDb::new().await;
        let repo = UserRepository::new(db.pool());
        let username = Username::parse("keeper").unwrap();

        let created = repo.create(&username, "hash").await.unwrap();
        assert_eq!(created.username, username);

        let fetched = repo.get_by_username(&username).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        let (user, hash) = repo
            .get_with_password_hash(&username)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, created.id);
        assert_eq!(hash, "hash");
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let db = TestDb::new().await;
        let repo = UserRepository::new(db.pool());
        let username = Username::parse("keeper").unwrap();

        repo.create(&username, "hash").await.unwrap();
        assert!(matches!(
            repo.create(&username, "other").await,
            Err(RepositoryError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_password_hash() {
        let db = TestDb::new().await;
        let repo = UserRepository::new(db.pool());
        let username = Username::parse("keeper").unwrap();

        let user = repo.create(&username, "old").await.unwrap();
        repo.update_password_hash(user.id, "new").await.unwrap();

        let (_, hash) = repo
            .get_with_password_hash(&username)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hash, "new");

        assert!(matches!(
            repo.update_password_hash(UserId::new(404), "x").await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_unknown_username() {
        let db = TestDb::new().await;
        let repo = UserRepository::new(db.pool());
        let username = Username::parse("ghost").unwrap();
        assert!(repo.get_by_username(&username).await.unwrap().is_none());
        assert!(repo.get_with_password_hash(&username).await.unwrap().is_none());
    }
}
