/// Token claims
///
/// The signed payload embedded in every token: user snapshot plus the
/// standard JWT claims (RFC 7519) and the token class discriminator.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Token class discriminator.
///
/// A refresh token must never be accepted where an access token is
/// expected, and vice versa; validation checks this independently of
/// signature and expiry.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenClass::Access => write!(f, "access"),
            TokenClass::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT claims for both token classes
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// User email, snapshotted at issuance
    pub email: String,
    /// Token class: access or refresh
    pub token_use: TokenClass,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Per-token nonce, makes both halves of a pair distinct even when
    /// issued within the same second
    pub jti: String,
}

impl Claims {
    /// Create new claims for a user.
    ///
    /// `issued_at` is passed in rather than sampled here so that both
    /// tokens of a pair share one issuance baseline.
    pub fn new(
        user_id: Uuid,
        email: String,
        token_use: TokenClass,
        issued_at: i64,
        expiry_seconds: i64,
        issuer: String,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            email,
            token_use,
            exp: issued_at + expiry_seconds,
            iat: issued_at,
            iss: issuer,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns error if user ID is not a valid UUID
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::Internal("Invalid user ID in token".to_string()))
    }

    /// Check if token has expired
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }
}
