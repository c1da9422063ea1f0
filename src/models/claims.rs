use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::Document;

/// How long an issued token stays valid, in seconds.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Registered JWT claims a caller may not set on its own token.
const REGISTERED_CLAIMS: &[&str] = &["iat", "exp", "nbf", "aud", "iss", "sub", "jti"];

/// Identity payload accepted at sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(flatten)]
    pub extra: Document,
}

/// Decoded payload of a verified token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub email: String,
    #[serde(flatten)]
    pub extra: Document,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn issue(identity: Identity) -> Self {
        let now = Utc::now().timestamp();
        let mut extra = identity.extra;
        for claim in REGISTERED_CLAIMS {
            extra.remove(*claim);
        }
        Self {
            email: identity.email,
            extra,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        }
    }
}
