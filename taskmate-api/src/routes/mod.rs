/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, verification, login, and password recovery
/// - `profile`: Account endpoints for the authenticated user
/// - `tasks`: Task CRUD and sharing

pub mod auth;
pub mod health;
pub mod profile;
pub mod tasks;
