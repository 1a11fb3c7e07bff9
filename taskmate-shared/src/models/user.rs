/// User model and database operations
///
/// This module provides the User model and the account mutations used by the
/// auth flows: OTP storage and consumption, email verification, password
/// changes, and profile updates.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     username VARCHAR(50) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     email_verified_at TIMESTAMPTZ,
///     password_hash VARCHAR(255) NOT NULL,
///     otp VARCHAR(6),
///     otp_expires_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// The `otp`/`otp_expires_at` pair is always written together: issuing a code
/// sets both, consuming or resetting clears both in the same statement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, username, email, email_verified_at, password_hash, \
                            otp, otp_expires_at, created_at, updated_at";

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Unique handle used for task sharing
    pub username: String,

    /// Email address, unique across all users
    pub email: String,

    /// When the email address was verified (None until verified)
    pub email_verified_at: Option<DateTime<Utc>>,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Pending one-time code (6-digit numeric string)
    #[serde(skip_serializing)]
    pub otp: Option<String>,

    /// When the pending one-time code expires
    #[serde(skip_serializing)]
    pub otp_expires_at: Option<DateTime<Utc>>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name
    pub name: String,

    /// Unique handle
    pub username: String,

    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

/// Public view of a user, safe to return to clients
///
/// Never carries the password hash or OTP state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    /// User ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Unique handle
    pub username: String,

    /// Email address
    pub email: String,

    /// When the email address was verified
    pub email_verified_at: Option<DateTime<Utc>>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            email_verified_at: user.email_verified_at,
            created_at: user.created_at,
        }
    }
}

impl User {
    /// Whether the account has completed email verification
    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }

    /// Creates a new, unverified user
    ///
    /// # Errors
    ///
    /// Returns a database error if the email or username is already taken
    /// (unique constraint violation) or the connection fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(data.name)
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by username (used to resolve share recipients)
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    /// Loads users by id, for resolving task owners in listings
    pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Finds the user matching both email and pending one-time code
    ///
    /// Returns None when either does not match; the caller is responsible for
    /// the expiry check so that valid-but-expired and plain-wrong codes are
    /// indistinguishable to clients.
    pub async fn find_by_email_and_otp(
        pool: &PgPool,
        email: &str,
        code: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND otp = $2"
        ))
        .bind(email)
        .bind(code)
        .fetch_optional(pool)
        .await
    }

    /// Stores a fresh one-time code, overwriting any prior unconsumed code
    pub async fn store_otp(
        pool: &PgPool,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET otp = $2, otp_expires_at = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Stamps the verification timestamp and consumes the one-time code
    ///
    /// Both OTP columns are cleared in the same statement that sets
    /// `email_verified_at`, so a replayed code can never verify twice.
    pub async fn mark_email_verified(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET email_verified_at = NOW(), otp = NULL, otp_expires_at = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Replaces the password hash and consumes the reset code in one mutation
    pub async fn reset_password(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, otp = NULL, otp_expires_at = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Replaces the password hash (change-password flow, OTP state untouched)
    pub async fn update_password(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Updates name and username
    ///
    /// # Errors
    ///
    /// Returns a database error if the new username is already taken.
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        name: &str,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = $2, username = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(name)
        .bind(username)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            email_verified_at: None,
            password_hash: "$argon2id$stub".to_string(),
            otp: None,
            otp_expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_verified() {
        let mut user = sample_user();
        assert!(!user.is_verified());

        user.email_verified_at = Some(Utc::now());
        assert!(user.is_verified());
    }

    #[test]
    fn test_user_view_excludes_credentials() {
        let user = sample_user();
        let view = UserView::from(&user);

        assert_eq!(view.id, user.id);
        assert_eq!(view.username, "testuser");

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("otp").is_none());
    }

    #[test]
    fn test_user_serialization_skips_secrets() {
        let mut user = sample_user();
        user.otp = Some("123456".to_string());
        user.otp_expires_at = Some(Utc::now());

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("otp").is_none());
        assert!(json.get("otp_expires_at").is_none());
        assert_eq!(json["email"], "test@example.com");
    }

    // Integration tests for database operations are in taskmate-api/tests/.
}
