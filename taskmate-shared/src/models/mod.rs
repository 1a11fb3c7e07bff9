/// Database models for Taskmate
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts, credentials, and email-verification state
/// - `access_token`: Opaque bearer tokens for authenticated requests
/// - `task`: Tasks owned by a user
/// - `share_grant`: Read grants linking a task to a recipient user

pub mod access_token;
pub mod share_grant;
pub mod task;
pub mod user;
