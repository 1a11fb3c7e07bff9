//! # Taskmate Shared Library
//!
//! This crate contains the types, database models, and auth utilities shared
//! by the Taskmate API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Password hashing, OTP codes, and bearer-token middleware
//! - `db`: Connection pool and migration runner
//! - `mail`: Outbound mail seam

pub mod auth;
pub mod db;
pub mod mail;
pub mod models;

/// Current version of the taskmate shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
