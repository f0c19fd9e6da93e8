use chrono::Utc;

mod campaign;
mod signup;

pub use campaign::Campaign;
pub use signup::{signup_key, SignupRecord, CONTACT_SIGNUP_TYPE, PLACEHOLDER_EMAIL_PREFIX};

/// Current time as milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
