/// One-time verification codes
///
/// Codes prove control of an email address during registration and password
/// reset. A code is a uniformly random 6-digit number, valid for 20 minutes
/// from issuance. Issuing a new code overwrites any prior unconsumed one;
/// there is no rate limiting or lockout.
///
/// # Example
///
/// ```
/// use taskmate_shared::auth::otp;
///
/// let code = otp::generate_code();
/// assert_eq!(code.len(), 6);
/// ```

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How long an issued code stays valid
pub const OTP_TTL_MINUTES: i64 = 20;

/// What a submitted code is being used for
///
/// Password-reset validation must leave the code intact so the reset step
/// can present it again; every other purpose consumes the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OtpPurpose {
    /// Email verification after registration (consumes the code)
    Verification,

    /// Password reset pre-check (leaves the code intact)
    PasswordReset,
}

impl OtpPurpose {
    /// Whether a successful validation under this purpose consumes the code
    pub fn consumes_code(&self) -> bool {
        matches!(self, OtpPurpose::Verification)
    }
}

/// Generates a uniformly random 6-digit code (100000–999999 inclusive)
pub fn generate_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    code.to_string()
}

/// Expiry instant for a code issued at `issued_at`
pub fn expiry_from(issued_at: DateTime<Utc>) -> DateTime<Utc> {
    issued_at + Duration::minutes(OTP_TTL_MINUTES)
}

/// Whether a stored expiry has passed at `now`
///
/// The comparison is strict: a code checked at the exact stored expiry
/// instant is still valid.
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at < now
}
