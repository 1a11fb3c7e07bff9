/// Integration tests for the Taskmate API
///
/// These tests exercise the full router end-to-end: registration and OTP
/// verification, login and token revocation, task CRUD, sharing, and the
/// pagination/filtering contract.
///
/// They require a running PostgreSQL database (DATABASE_URL, falling back to
/// a local taskmate_test database) and are therefore ignored by default:
///
/// ```bash
/// cargo test -p taskmate-api --test api_test -- --ignored --test-threads=1
/// ```

mod common;

use axum::http::{Method, StatusCode};
use common::{TestContext, TEST_PASSWORD};
use serde_json::json;
use taskmate_shared::models::access_token::AccessToken;
use taskmate_shared::models::share_grant::ShareGrant;
use taskmate_shared::models::task::Task;
use taskmate_shared::models::user::User;
use uuid::Uuid;

fn unique_email() -> String {
    format!("reg-{}@example.com", &Uuid::new_v4().simple().to_string()[..12])
}

fn unique_username() -> String {
    format!("reg_{}", &Uuid::new_v4().simple().to_string()[..12])
}

/// Registering creates an unverified user and stores an OTP; duplicates are 409
#[ignore]
#[tokio::test]
async fn test_register_creates_unverified_user() {
    let mut ctx = TestContext::new().await.unwrap();

    let email = unique_email();
    let username = unique_username();

    let (status, body) = ctx
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Reg User",
                "username": username,
                "email": email,
                "password": "password123",
            })),
        )
        .await;
    ctx.track_user_by_email(&email).await.unwrap();

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["result"], true);

    let user = User::find_by_email(&ctx.db, &email).await.unwrap().unwrap();
    assert!(user.email_verified_at.is_none());
    assert!(user.otp.is_some(), "registration should store an OTP");
    assert!(user.otp_expires_at.is_some());

    // Same email again: 409, no duplicate row
    let (status, _) = ctx
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Reg User",
                "username": unique_username(),
                "email": email,
                "password": "password123",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Same username: 409 as well
    let (status, _) = ctx
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Reg User",
                "username": username,
                "email": unique_email(),
                "password": "password123",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    ctx.cleanup().await.unwrap();
}

/// Register rejects malformed input with field-level messages
#[ignore]
#[tokio::test]
async fn test_register_validation() {
    let mut ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Reg User",
                "username": unique_username(),
                "email": "not-an-email",
                "password": "short",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Validation failed");
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"]["password"].is_array());

    ctx.cleanup().await.unwrap();
}

/// The full verification gate: login fails until the OTP is consumed, then
/// succeeds and returns a token plus the public user view
#[ignore]
#[tokio::test]
async fn test_verification_gate_end_to_end() {
    let mut ctx = TestContext::new().await.unwrap();

    let email = unique_email();
    let username = unique_username();

    let (status, _) = ctx
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Gate User",
                "username": username,
                "email": email,
                "password": "password123",
            })),
        )
        .await;
    ctx.track_user_by_email(&email).await.unwrap();
    assert_eq!(status, StatusCode::OK);

    // Correct password, but unverified
    let (status, body) = ctx
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["email"][0], "Email not verified.");

    // Wrong code
    let (status, _) = ctx
        .request(
            Method::POST,
            "/auth/verify-email",
            None,
            Some(json!({ "email": email, "code": "000000" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Correct code verifies the account
    let code = ctx.user_otp(&email).await.unwrap().unwrap();
    let (status, _) = ctx
        .request(
            Method::POST,
            "/auth/verify-email",
            None,
            Some(json!({ "email": email, "code": code })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let user = User::find_by_email(&ctx.db, &email).await.unwrap().unwrap();
    assert!(user.email_verified_at.is_some());
    assert!(user.otp.is_none(), "code should be consumed");

    // Replay of the consumed code fails
    let (status, _) = ctx
        .request(
            Method::POST,
            "/auth/verify-email",
            None,
            Some(json!({ "email": email, "code": code })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Login now succeeds and never leaks the hash
    let (status, body) = ctx
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], true);
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["access_token"].as_str().unwrap().starts_with("tm_"));
    assert_eq!(body["user"]["username"], username);
    assert!(body["user"].get("password_hash").is_none());

    ctx.cleanup().await.unwrap();
}

/// Unknown email and wrong password produce the same message
#[ignore]
#[tokio::test]
async fn test_login_does_not_reveal_which_check_failed() {
    let mut ctx = TestContext::new().await.unwrap();
    let (user, _) = ctx.create_user().await.unwrap();

    let (status, body) = ctx
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": user.email, "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let wrong_password_message = body["errors"]["email"][0].clone();

    let (status, body) = ctx
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": unique_email(), "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["email"][0], wrong_password_message);

    ctx.cleanup().await.unwrap();
}

/// A code past its expiry is rejected with the same error as a wrong code
#[ignore]
#[tokio::test]
async fn test_expired_code_rejected() {
    let mut ctx = TestContext::new().await.unwrap();
    let user = ctx.create_unverified_user().await.unwrap();

    sqlx::query(
        "UPDATE users SET otp = '123456', otp_expires_at = NOW() - INTERVAL '1 minute' WHERE id = $1",
    )
    .bind(user.id)
    .execute(&ctx.db)
    .await
    .unwrap();

    let (status, _) = ctx
        .request(
            Method::POST,
            "/auth/verify-email",
            None,
            Some(json!({ "email": user.email, "code": "123456" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    ctx.cleanup().await.unwrap();
}

/// Password reset: the pre-check leaves the code intact, the reset consumes
/// it and replaces the password
#[ignore]
#[tokio::test]
async fn test_password_reset_flow() {
    let mut ctx = TestContext::new().await.unwrap();
    let (user, _) = ctx.create_user().await.unwrap();

    let (status, _) = ctx
        .request(
            Method::POST,
            "/auth/forgot-password",
            None,
            Some(json!({ "email": user.email })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let code = ctx.user_otp(&user.email).await.unwrap().unwrap();

    // Pre-check under the password-reset purpose does not consume the code
    let (status, _) = ctx
        .request(
            Method::POST,
            "/auth/verify-email",
            None,
            Some(json!({ "email": user.email, "code": code, "purpose": "password-reset" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.user_otp(&user.email).await.unwrap(), Some(code.clone()));

    // Reset replaces the password and clears the code together
    let (status, _) = ctx
        .request(
            Method::POST,
            "/auth/reset-password",
            None,
            Some(json!({ "email": user.email, "code": code, "password": "brand-new-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.user_otp(&user.email).await.unwrap(), None);

    let (status, _) = ctx
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": user.email, "password": "brand-new-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": user.email, "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    ctx.cleanup().await.unwrap();
}

/// Forgot-password for an unknown address is a 404
#[ignore]
#[tokio::test]
async fn test_forgot_password_unknown_email() {
    let mut ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request(
            Method::POST,
            "/auth/forgot-password",
            None,
            Some(json!({ "email": unique_email() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No email found.");

    ctx.cleanup().await.unwrap();
}

/// Profile round trip and username conflicts
#[ignore]
#[tokio::test]
async fn test_profile_and_update() {
    let mut ctx = TestContext::new().await.unwrap();
    let (user, token) = ctx.create_user().await.unwrap();
    let (other, _) = ctx.create_user().await.unwrap();

    let (status, body) = ctx
        .request(Method::GET, "/auth/profile", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], user.email.as_str());
    assert!(body["data"].get("password_hash").is_none());

    let (status, _) = ctx
        .request(
            Method::PUT,
            "/auth/update-profile",
            Some(&token),
            Some(json!({ "name": "Renamed", "username": unique_username() })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Taking another user's username is a conflict
    let (status, _) = ctx
        .request(
            Method::PUT,
            "/auth/update-profile",
            Some(&token),
            Some(json!({ "name": "Renamed", "username": other.username })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    ctx.cleanup().await.unwrap();
}

/// Change-password verifies the current password first
#[ignore]
#[tokio::test]
async fn test_change_password() {
    let mut ctx = TestContext::new().await.unwrap();
    let (user, token) = ctx.create_user().await.unwrap();

    let (status, _) = ctx
        .request(
            Method::PUT,
            "/auth/change-password",
            Some(&token),
            Some(json!({ "current_password": "not-the-password", "new_password": "another-pass-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .request(
            Method::PUT,
            "/auth/change-password",
            Some(&token),
            Some(json!({ "current_password": TEST_PASSWORD, "new_password": "another-pass-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": user.email, "password": "another-pass-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    ctx.cleanup().await.unwrap();
}

/// Logout revokes every outstanding token; revoking again is a no-op
#[ignore]
#[tokio::test]
async fn test_logout_revokes_tokens() {
    let mut ctx = TestContext::new().await.unwrap();
    let (user, token) = ctx.create_user().await.unwrap();
    let (_, second_token) = AccessToken::issue(&ctx.db, user.id, None).await.unwrap();

    let (status, _) = ctx
        .request(Method::POST, "/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // Both tokens are dead
    let (status, _) = ctx
        .request(Method::GET, "/auth/profile", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = ctx
        .request(Method::GET, "/auth/profile", Some(&second_token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Idempotent at the store level
    let revoked = AccessToken::revoke_all_for_user(&ctx.db, user.id).await.unwrap();
    assert_eq!(revoked, 0);

    ctx.cleanup().await.unwrap();
}

/// Creating a task forces status to incomplete regardless of the payload
#[ignore]
#[tokio::test]
async fn test_create_task_forces_incomplete() {
    let mut ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.create_user().await.unwrap();

    let (status, body) = ctx
        .request(
            Method::POST,
            "/tasks",
            Some(&token),
            Some(json!({
                "title": "Ship the release",
                "category": "deployment",
                "priority": "high",
                "status": "complete",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["data"]["status"], "incomplete");
    assert_eq!(body["data"]["category"], "deployment");
    assert_eq!(body["data"]["can_delete"], true);

    ctx.cleanup().await.unwrap();
}

/// Task titles are required and bounded
#[ignore]
#[tokio::test]
async fn test_create_task_validation() {
    let mut ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.create_user().await.unwrap();

    let (status, body) = ctx
        .request(
            Method::POST,
            "/tasks",
            Some(&token),
            Some(json!({ "title": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["title"].is_array());

    ctx.cleanup().await.unwrap();
}

/// Pagination: limits above the cap are silently clamped to 20
#[ignore]
#[tokio::test]
async fn test_list_pagination_clamped() {
    let mut ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.create_user().await.unwrap();

    for i in 0..25 {
        let (status, _) = ctx
            .request(
                Method::POST,
                "/tasks",
                Some(&token),
                Some(json!({ "title": format!("Task {}", i) })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = ctx
        .request(Method::GET, "/tasks?limit=100", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tasks"].as_array().unwrap().len(), 20);
    assert_eq!(body["data"]["meta"]["per_page"], 20);
    assert_eq!(body["data"]["meta"]["total"], 25);
    assert_eq!(body["data"]["meta"]["last_page"], 2);

    let (status, body) = ctx
        .request(Method::GET, "/tasks?limit=5&page=2", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tasks"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["meta"]["current_page"], 2);
    assert_eq!(body["data"]["meta"]["per_page"], 5);

    ctx.cleanup().await.unwrap();
}

/// Filters apply as conjunctions over the visible set
#[ignore]
#[tokio::test]
async fn test_list_filters_are_conjunctions() {
    let mut ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.create_user().await.unwrap();

    for (title, category, priority) in [
        ("Backend high", "backend", "high"),
        ("Backend low", "backend", "low"),
        ("Testing high", "testing", "high"),
    ] {
        let (status, _) = ctx
            .request(
                Method::POST,
                "/tasks",
                Some(&token),
                Some(json!({ "title": title, "category": category, "priority": priority })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = ctx
        .request(
            Method::GET,
            "/tasks?category=backend&priority=high",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let tasks = body["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Backend high");

    ctx.cleanup().await.unwrap();
}

/// Sharing: idempotent grants, recipient visibility, and error cases
#[ignore]
#[tokio::test]
async fn test_share_task_flow() {
    let mut ctx = TestContext::new().await.unwrap();
    let (owner, owner_token) = ctx.create_user().await.unwrap();
    let (recipient, recipient_token) = ctx.create_user().await.unwrap();

    let (_, body) = ctx
        .request(
            Method::POST,
            "/tasks",
            Some(&owner_token),
            Some(json!({ "title": "Shared task" })),
        )
        .await;
    let task_id: Uuid = body["data"]["id"].as_str().unwrap().parse().unwrap();

    // Unknown username
    let (status, body) = ctx
        .request(
            Method::POST,
            "/tasks/share",
            Some(&owner_token),
            Some(json!({ "tasks": [task_id], "username": "no_such_user_xyz" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Username not found");

    // Self-share
    let (status, _) = ctx
        .request(
            Method::POST,
            "/tasks/share",
            Some(&owner_token),
            Some(json!({ "tasks": [task_id], "username": owner.username })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Non-array payload
    let (status, _) = ctx
        .request(
            Method::POST,
            "/tasks/share",
            Some(&owner_token),
            Some(json!({ "tasks": "not-a-list", "username": recipient.username })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Sharing twice leaves exactly one grant (null entries are skipped)
    for _ in 0..2 {
        let (status, _) = ctx
            .request(
                Method::POST,
                "/tasks/share",
                Some(&owner_token),
                Some(json!({ "tasks": [task_id, null, ""], "username": recipient.username })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    let grants = ShareGrant::count_for_task(&ctx.db, task_id, Some(recipient.id))
        .await
        .unwrap();
    assert_eq!(grants, 1);

    // Recipient sees the task under shared=true, without owner powers
    let (status, body) = ctx
        .request(Method::GET, "/tasks?shared=true", Some(&recipient_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let tasks = body["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], task_id.to_string());
    assert_eq!(tasks[0]["can_delete"], false);
    assert_eq!(tasks[0]["user"]["username"], owner.username);

    // The owner's shared=true view is empty; the union view still has it
    let (_, body) = ctx
        .request(Method::GET, "/tasks?shared=true", Some(&owner_token), None)
        .await;
    assert!(body["data"]["tasks"].as_array().unwrap().is_empty());
    let (_, body) = ctx
        .request(Method::GET, "/tasks", Some(&recipient_token), None)
        .await;
    assert_eq!(body["data"]["tasks"].as_array().unwrap().len(), 1);

    ctx.cleanup().await.unwrap();
}

/// Fetching a single task: owner and recipient see it, strangers get 404
#[ignore]
#[tokio::test]
async fn test_show_task_visibility() {
    let mut ctx = TestContext::new().await.unwrap();
    let (_, owner_token) = ctx.create_user().await.unwrap();
    let (recipient, recipient_token) = ctx.create_user().await.unwrap();
    let (_, stranger_token) = ctx.create_user().await.unwrap();

    let (_, body) = ctx
        .request(
            Method::POST,
            "/tasks",
            Some(&owner_token),
            Some(json!({ "title": "Visibility" })),
        )
        .await;
    let task_id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/tasks/{}", task_id);

    let (status, _) = ctx.request(Method::GET, &uri, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);

    // Before the grant the recipient is a stranger too
    let (status, _) = ctx
        .request(Method::GET, &uri, Some(&recipient_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .request(
            Method::POST,
            "/tasks/share",
            Some(&owner_token),
            Some(json!({ "tasks": [task_id], "username": recipient.username })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request(Method::GET, &uri, Some(&recipient_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request(Method::GET, &uri, Some(&stranger_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// Updates are owner-only and can complete a task
#[ignore]
#[tokio::test]
async fn test_update_task_owner_only() {
    let mut ctx = TestContext::new().await.unwrap();
    let (_, owner_token) = ctx.create_user().await.unwrap();
    let (_, other_token) = ctx.create_user().await.unwrap();

    let (_, body) = ctx
        .request(
            Method::POST,
            "/tasks",
            Some(&owner_token),
            Some(json!({ "title": "To update" })),
        )
        .await;
    let uri = format!("/tasks/{}", body["data"]["id"].as_str().unwrap());

    let (status, _) = ctx
        .request(
            Method::PUT,
            &uri,
            Some(&other_token),
            Some(json!({ "status": "complete" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .request(
            Method::PUT,
            &uri,
            Some(&owner_token),
            Some(json!({ "status": "complete", "title": "Updated title" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "complete");
    assert_eq!(body["data"]["title"], "Updated title");

    ctx.cleanup().await.unwrap();
}

/// Deletion is owner-only; grants disappear with the task
#[ignore]
#[tokio::test]
async fn test_delete_task_owner_only_and_cascade() {
    let mut ctx = TestContext::new().await.unwrap();
    let (_, owner_token) = ctx.create_user().await.unwrap();
    let (recipient, other_token) = ctx.create_user().await.unwrap();

    let (_, body) = ctx
        .request(
            Method::POST,
            "/tasks",
            Some(&owner_token),
            Some(json!({ "title": "To delete" })),
        )
        .await;
    let task_id: Uuid = body["data"]["id"].as_str().unwrap().parse().unwrap();
    let uri = format!("/tasks/{}", task_id);

    let (status, _) = ctx
        .request(
            Method::POST,
            "/tasks/share",
            Some(&owner_token),
            Some(json!({ "tasks": [task_id], "username": recipient.username })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Non-owner (even a grant recipient) cannot delete
    let (status, _) = ctx
        .request(Method::DELETE, &uri, Some(&other_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .request(Method::DELETE, &uri, Some(&owner_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    assert!(Task::find_by_id(&ctx.db, task_id).await.unwrap().is_none());
    let grants = ShareGrant::count_for_task(&ctx.db, task_id, None).await.unwrap();
    assert_eq!(grants, 0, "grants should cascade away with the task");

    ctx.cleanup().await.unwrap();
}

/// Requests without a valid bearer token are rejected
#[ignore]
#[tokio::test]
async fn test_authentication_required() {
    let mut ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.request(Method::GET, "/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    let (status, _) = ctx
        .request(Method::GET, "/tasks", Some("tm_bogus_token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

/// Health endpoint reports database connectivity
#[ignore]
#[tokio::test]
async fn test_health_check() {
    let mut ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");

    ctx.cleanup().await.unwrap();
}
