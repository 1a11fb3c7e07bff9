/// Bearer-token authentication middleware for Axum
///
/// Extracts the `Authorization: Bearer <token>` header, resolves the token
/// against the access_tokens table, and injects the authenticated user into
/// request extensions. Tokens are opaque: validation is a digest lookup, so
/// revoked tokens fail immediately.
///
/// # Request Extensions
///
/// After successful authentication the middleware adds an [`AuthUser`],
/// which handlers extract with Axum's `Extension` extractor:
///
/// ```
/// use axum::Extension;
/// use taskmate_shared::auth::middleware::AuthUser;
///
/// async fn handler(Extension(auth): Extension<AuthUser>) -> String {
///     format!("Hello, {}!", auth.username)
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{access_token::AccessToken, user::User};

/// Authenticated caller, added to request extensions
///
/// Deliberately excludes the password hash and OTP state; handlers that need
/// them (e.g. change-password) reload the full user row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// Authenticated user ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Unique handle
    pub username: String,

    /// Email address
    pub email: String,
}

impl AuthUser {
    /// Builds the auth context from a loaded user row
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Error type for the authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing or malformed authorization header
    MissingCredentials,

    /// Token unknown, revoked, or expired
    InvalidToken,

    /// Database error during token lookup
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials | AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthorized" })),
            )
                .into_response(),
            AuthError::DatabaseError(detail) => {
                tracing::error!("Auth middleware database error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "message": "An unexpected error occurred. Please try again later."
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// Bearer-token authentication middleware
///
/// # Errors
///
/// Returns 401 Unauthorized if:
/// - The Authorization header is missing or not a Bearer token
/// - The token digest has no matching row (unknown or revoked)
/// - The token has expired
pub async fn bearer_auth_middleware(
    pool: PgPool,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let plaintext = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingCredentials)?;

    let token = AccessToken::validate(&pool, plaintext)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::InvalidToken)?;

    if token.is_expired() {
        return Err(AuthError::InvalidToken);
    }

    AccessToken::touch(&pool, token.id)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

    // The token row cascades away with its user, so a hit here should always
    // resolve; treat a missing user as an invalid token all the same.
    let user = User::find_by_id(&pool, token.user_id)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::InvalidToken)?;

    req.extensions_mut().insert(AuthUser::from_user(&user));

    Ok(next.run(req).await)
}

/// Creates a bearer-token middleware closure capturing the pool
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use sqlx::PgPool;
/// use taskmate_shared::auth::middleware::create_bearer_middleware;
///
/// fn protected_routes(pool: PgPool) -> Router {
///     Router::new()
///         .route("/profile", get(|| async { "OK" }))
///         .layer(middleware::from_fn(create_bearer_middleware(pool)))
/// }
/// ```
pub fn create_bearer_middleware(
    pool: PgPool,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    move |req, next| {
        let pool = pool.clone();
        Box::pin(bearer_auth_middleware(pool, req, next))
    }
}
