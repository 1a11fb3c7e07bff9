/// Authentication endpoints
///
/// Registration, OTP email verification, login, and password recovery.
///
/// # Endpoints
///
/// - `POST /auth/register` - Create account, triggers OTP email
/// - `POST /auth/resend-code` - Re-issue OTP
/// - `POST /auth/verify-email` - Validate/consume OTP
/// - `POST /auth/login` - Issue bearer token
/// - `POST /auth/forgot-password` - Issue password-reset OTP
/// - `POST /auth/reset-password` - Validate reset OTP and set new password

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::success_message,
};
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use taskmate_shared::{
    auth::{otp, otp::OtpPurpose, password},
    mail::MailMessage,
    models::{access_token::AccessToken, user::CreateUser, user::User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: String,

    /// Unique handle
    #[validate(length(min = 1, max = 50, message = "The username field is required."))]
    pub username: String,

    /// Email address
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "The password must be at least 8 characters."))]
    pub password: String,
}

/// Resend-code / forgot-password request
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    /// Email address the code should be sent to
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
}

/// Verify-email request
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    /// Email address the code was sent to
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,

    /// Submitted one-time code
    #[validate(length(equal = 6, message = "The code must be 6 digits."))]
    pub code: String,

    /// What the code is used for; defaults to account verification
    pub purpose: Option<OtpPurpose>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "The password must be at least 8 characters."))]
    pub password: String,
}

/// Reset-password request
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// Email address the reset code was sent to
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,

    /// Submitted one-time code
    #[validate(length(equal = 6, message = "The code must be 6 digits."))]
    pub code: String,

    /// New password
    #[validate(length(min = 8, message = "The password must be at least 8 characters."))]
    pub password: String,
}

/// Public user view embedded in the login response
#[derive(Debug, Serialize)]
pub struct LoginUser {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Unique handle
    pub username: String,
}

/// Login response
///
/// The one success body that does not use the standard envelope; its shape
/// is part of the documented API.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub result: bool,

    /// Opaque bearer token (only returned here, never again)
    pub access_token: String,

    /// Always "Bearer"
    pub token_type: String,

    /// Public view of the authenticated user
    pub user: LoginUser,
}

/// Generates, stores, and dispatches a fresh one-time code
///
/// Overwrites any prior unconsumed code for the user. A dispatch failure
/// surfaces as an error to the caller; the stored code is left in place and
/// a resend will mint a new one.
async fn issue_code(state: &AppState, user: &User, title: &str) -> Result<(), ApiError> {
    let code = otp::generate_code();
    let expires_at = otp::expiry_from(Utc::now());

    User::store_otp(&state.db, user.id, &code, expires_at).await?;

    let message =
        MailMessage::verification_code(&state.config.mail.app_name, &user.email, &code, title);
    state.mailer.send(&message).await?;

    Ok(())
}

/// Checks a submitted code against the stored OTP state
///
/// Returns the matching user, or the given domain error when the code is
/// unknown or past its expiry. Wrong and expired codes are deliberately
/// indistinguishable.
async fn check_code(
    state: &AppState,
    email: &str,
    code: &str,
    error_message: &str,
) -> Result<User, ApiError> {
    let user = User::find_by_email_and_otp(&state.db, email, code)
        .await?
        .ok_or_else(|| ApiError::BadRequest(error_message.to_string()))?;

    match user.otp_expires_at {
        Some(expires_at) if !otp::is_expired(expires_at, Utc::now()) => Ok(user),
        _ => Err(ApiError::BadRequest(error_message.to_string())),
    }
}

/// Register a new user
///
/// Creates an unverified account and sends a verification code to the
/// given address. Duplicate email or username is a 409.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            username: req.username,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    issue_code(&state, &user, "Email Verification").await?;

    Ok(success_message(
        "Successful: An OTP has been sent to your email for verification",
    ))
}

/// Re-issue the verification code
///
/// Overwrites any previous code. No rate limiting by design.
pub async fn resend_code(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No email found.".to_string()))?;

    issue_code(&state, &user, "Email Verification").await?;

    Ok(success_message("Verification code resent successfully"))
}

/// Validate a one-time code
///
/// For the password-reset purpose the code is checked but left intact so the
/// reset step can present it again. Any other purpose stamps the account as
/// verified and consumes the code.
pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyEmailRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let user = check_code(
        &state,
        &req.email,
        &req.code,
        "Invalid or expired verification code, resend code.",
    )
    .await?;

    let purpose = req.purpose.unwrap_or(OtpPurpose::Verification);
    if purpose.consumes_code() {
        User::mark_email_verified(&state.db, user.id).await?;
    }

    Ok(success_message("Email verified successfully"))
}

/// Login
///
/// Unknown email and wrong password collapse into the same message so the
/// response does not reveal which accounts exist. Unverified accounts cannot
/// log in.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let invalid_credentials =
        || ApiError::field_error("email", "The provided credentials are incorrect.");

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(invalid_credentials());
    }

    if !user.is_verified() {
        return Err(ApiError::field_error("email", "Email not verified."));
    }

    let (_, plaintext) = AccessToken::issue(&state.db, user.id, state.token_ttl()).await?;

    Ok(Json(LoginResponse {
        result: true,
        access_token: plaintext,
        token_type: "Bearer".to_string(),
        user: LoginUser {
            name: user.name,
            email: user.email,
            username: user.username,
        },
    }))
}

/// Forgot password
///
/// Issues a reset code through the same OTP path as verification.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No email found.".to_string()))?;

    issue_code(&state, &user, "Password Reset").await?;

    Ok(success_message(
        "An OTP has been sent to your email for password reset",
    ))
}

/// Reset password
///
/// Validates the reset code (without consuming it), then replaces the
/// password hash and clears the code in a single mutation.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let user = check_code(
        &state,
        &req.email,
        &req.code,
        "Invalid or expired verification code.",
    )
    .await?;

    let password_hash = password::hash_password(&req.password)?;
    User::reset_password(&state.db, user.id, &password_hash).await?;

    Ok(success_message("Password reset successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            name: "Test User".to_string(),
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid_request()
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: "short".to_string(),
            ..valid_request()
        };
        assert!(short_password.validate().is_err());

        let empty_username = RegisterRequest {
            username: String::new(),
            ..valid_request()
        };
        assert!(empty_username.validate().is_err());
    }

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            name: "Test User".to_string(),
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        }
    }

    #[test]
    fn test_verify_email_request_code_length() {
        let valid = VerifyEmailRequest {
            email: "test@example.com".to_string(),
            code: "123456".to_string(),
            purpose: None,
        };
        assert!(valid.validate().is_ok());

        let short = VerifyEmailRequest {
            code: "123".to_string(),
            ..valid
        };
        assert!(short.validate().is_err());
    }

    #[test]
    fn test_purpose_deserializes_from_kebab_case() {
        let req: VerifyEmailRequest = serde_json::from_str(
            r#"{"email": "a@b.com", "code": "123456", "purpose": "password-reset"}"#,
        )
        .unwrap();
        assert_eq!(req.purpose, Some(OtpPurpose::PasswordReset));
    }
}
