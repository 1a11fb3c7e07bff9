/// Account endpoints for the authenticated user
///
/// All handlers here sit behind the bearer-token middleware and receive the
/// caller's identity explicitly through the `AuthUser` extension.
///
/// # Endpoints
///
/// - `GET /auth/profile` - Fetch the caller's user view
/// - `PUT /auth/update-profile` - Mutate name/username
/// - `PUT /auth/change-password` - Mutate password
/// - `POST /auth/logout` - Revoke all bearer tokens

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::success_message,
    response::success_data,
};
use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::Deserialize;
use taskmate_shared::{
    auth::{middleware::AuthUser, password},
    models::{access_token::AccessToken, user::User, user::UserView},
};
use validator::Validate;

/// Update-profile request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: String,

    /// New handle
    #[validate(length(min = 1, max = 50, message = "The username field is required."))]
    pub username: String,
}

/// Change-password request
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password, checked against the stored hash
    #[validate(length(min = 1, message = "The current password field is required."))]
    pub current_password: String,

    /// Replacement password
    #[validate(length(min = 8, message = "The new password must be at least 8 characters."))]
    pub new_password: String,
}

/// Fetch the caller's profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let user = User::find_by_id(&state.db, auth.id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(success_data("profile data fetched", UserView::from(&user)))
}

/// Update name and username
///
/// A username collision surfaces as a 409.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    User::update_profile(&state.db, auth.id, &req.name, &req.username)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(success_message("Profile updated successfully"))
}

/// Change the caller's password
///
/// Requires the current password; other sessions stay valid (tokens are not
/// revoked here).
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    // AuthUser carries no credential material; load the full row
    let user = User::find_by_id(&state.db, auth.id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !password::verify_password(&req.current_password, &user.password_hash)? {
        return Err(ApiError::BadRequest("Invalid current password.".to_string()));
    }

    let password_hash = password::hash_password(&req.new_password)?;
    User::update_password(&state.db, user.id, &password_hash).await?;

    Ok(success_message("Password changed successfully"))
}

/// Logout
///
/// Revokes every outstanding token for the caller. Idempotent: logging out
/// with no other active tokens is not an error.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    AccessToken::revoke_all_for_user(&state.db, auth.id).await?;

    Ok(success_message("You have successfully logged out"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_request_validation() {
        let valid = UpdateProfileRequest {
            name: "New Name".to_string(),
            username: "newname".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty_name = UpdateProfileRequest {
            name: String::new(),
            username: "newname".to_string(),
        };
        assert!(empty_name.validate().is_err());

        let long_username = UpdateProfileRequest {
            name: "New Name".to_string(),
            username: "u".repeat(51),
        };
        assert!(long_username.validate().is_err());
    }

    #[test]
    fn test_change_password_request_validation() {
        let valid = ChangePasswordRequest {
            current_password: "old_password".to_string(),
            new_password: "new_password_123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_new = ChangePasswordRequest {
            current_password: "old_password".to_string(),
            new_password: "short".to_string(),
        };
        assert!(short_new.validate().is_err());
    }
}
