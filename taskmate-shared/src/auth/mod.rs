/// Authentication utilities
///
/// - `password`: Argon2id password hashing and verification
/// - `otp`: one-time verification codes and their expiry rules
/// - `middleware`: Axum bearer-token middleware

pub mod middleware;
pub mod otp;
pub mod password;
