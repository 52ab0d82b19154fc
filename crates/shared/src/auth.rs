//! Claims carried by bearer tokens from the external auth service.

use serde::{Deserialize, Serialize};

use crate::types::OwnerId;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (owner id assigned by the auth service).
    pub sub: String,
    /// Email of the signed-in user, when the issuer includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Returns the owner id from claims.
    #[must_use]
    pub fn owner_id(&self) -> OwnerId {
        OwnerId::new(self.sub.clone())
    }
}
