//! Per-request salted token authentication.
//!
//! Subsonic never sends the password itself: each request carries a fresh
//! random salt and the MD5 digest of `password ++ salt`.

use rand::distributions::Alphanumeric;
use rand::Rng;

const SALT_LEN: usize = 12;

/// One-shot authentication material for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub salt: String,
    pub token: String,
}

impl AuthToken {
    /// Generate a fresh salt and token. Never reuse the result across
    /// requests; salts are single-use by design.
    pub fn generate(password: &str) -> Self {
        let salt: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LEN)
            .map(char::from)
            .collect();
        let token = format!("{:x}", md5::compute(format!("{password}{salt}")));
        Self { salt, token }
    }
}
