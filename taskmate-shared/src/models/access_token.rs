/// Access token model and database operations
///
/// Opaque bearer tokens backing authenticated requests. Unlike a signed
/// token, a database-backed token can be revoked: logout deletes every
/// outstanding row for the user and those tokens stop working immediately.
///
/// # Security
///
/// - Tokens are stored as SHA-256 digests (never plaintext)
/// - Tokens are prefixed with "tm_" for identification
/// - The full token is only returned on issuance (never again)
/// - Tokens can optionally expire
///
/// # Schema
///
/// ```sql
/// CREATE TABLE access_tokens (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     token_prefix VARCHAR(10) NOT NULL,
///     token_hash CHAR(64) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_used_at TIMESTAMPTZ,
///     expires_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

/// Access token model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessToken {
    /// Unique token ID
    pub id: Uuid,

    /// User this token authenticates
    pub user_id: Uuid,

    /// First 10 characters of the token (for display: "tm_abc12...")
    pub token_prefix: String,

    /// SHA-256 hex digest of the full token
    #[serde(skip_serializing)]
    pub token_hash: String,

    /// When the token was issued
    pub created_at: DateTime<Utc>,

    /// When the token last authenticated a request
    pub last_used_at: Option<DateTime<Utc>>,

    /// Optional expiration instant (None = never expires)
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Generates a secure random bearer token
    ///
    /// Format: tm_{40_random_alphanumerics}
    ///
    /// # Example
    ///
    /// ```
    /// use taskmate_shared::models::access_token::AccessToken;
    ///
    /// let token = AccessToken::generate_token();
    /// assert!(token.starts_with("tm_"));
    /// assert_eq!(token.len(), 43); // "tm_" (3) + 40 chars
    /// ```
    pub fn generate_token() -> String {
        use rand::Rng;
        const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        let mut rng = rand::thread_rng();

        let random: String = (0..40)
            .map(|_| {
                let idx = rng.gen_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect();

        format!("tm_{}", random)
    }

    /// Hashes a token with SHA-256
    ///
    /// # Example
    ///
    /// ```
    /// use taskmate_shared::models::access_token::AccessToken;
    ///
    /// let hash = AccessToken::hash_token("tm_abc123");
    /// assert_eq!(hash.len(), 64); // SHA-256 hex is 64 chars
    /// ```
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Extracts the display prefix from a token (first 10 chars)
    pub fn extract_prefix(token: &str) -> String {
        token.chars().take(10).collect()
    }

    /// Checks if the token is expired
    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            expires_at < Utc::now()
        } else {
            false
        }
    }

    /// Issues a new token for a user
    ///
    /// Returns both the database record and the plaintext token. The
    /// plaintext is only returned here and never stored.
    pub async fn issue(
        pool: &PgPool,
        user_id: Uuid,
        ttl_seconds: Option<i64>,
    ) -> Result<(Self, String), sqlx::Error> {
        let plaintext = Self::generate_token();
        let token_hash = Self::hash_token(&plaintext);
        let token_prefix = Self::extract_prefix(&plaintext);
        let expires_at = ttl_seconds.map(|secs| Utc::now() + Duration::seconds(secs));

        let token = sqlx::query_as::<_, AccessToken>(
            r#"
            INSERT INTO access_tokens (user_id, token_prefix, token_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, token_prefix, token_hash, created_at, last_used_at, expires_at
            "#,
        )
        .bind(user_id)
        .bind(token_prefix)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;

        Ok((token, plaintext))
    }

    /// Looks up a token record by its plaintext
    ///
    /// Returns None when no matching digest exists. Expiry is NOT checked
    /// here; callers decide how to treat expired tokens.
    pub async fn validate(pool: &PgPool, plaintext: &str) -> Result<Option<Self>, sqlx::Error> {
        let token_hash = Self::hash_token(plaintext);

        sqlx::query_as::<_, AccessToken>(
            r#"
            SELECT id, user_id, token_prefix, token_hash, created_at, last_used_at, expires_at
            FROM access_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Records that the token just authenticated a request
    pub async fn touch(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE access_tokens SET last_used_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Revokes every outstanding token for a user
    ///
    /// Idempotent: revoking when no tokens exist deletes zero rows and is
    /// not an error. Returns the number of tokens revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
