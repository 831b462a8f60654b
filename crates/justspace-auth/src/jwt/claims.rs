//! JWT claims payload embedded in every bearer token.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Claims carried by a justspace bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user ID the token was issued to.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the subject (user ID) this token was issued to.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
