/// Token Engine
///
/// Issues paired access/refresh tokens, validates a token's
/// signature/expiry/class, and rotates a refresh token into a new
/// pair. Tokens are HS256 JWTs signed with the service's symmetric
/// key; they are self-contained, so validation needs no store access.
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, TokenClass};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

/// One access token + one refresh token, always issued together.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issue a fresh token pair for a user.
///
/// Both tokens share the same issuance timestamp; the access token
/// expires after `access_token_expiry` seconds (15 minutes by
/// default), the refresh token after `refresh_token_expiry` seconds
/// (7 days by default).
///
/// # Errors
/// Returns error if signing fails
pub fn issue_token_pair(
    user_id: &Uuid,
    email: &str,
    config: &JwtSettings,
) -> Result<TokenPair, AppError> {
    let issued_at = chrono::Utc::now().timestamp();

    let access_claims = Claims::new(
        *user_id,
        email.to_string(),
        TokenClass::Access,
        issued_at,
        config.access_token_expiry,
        config.issuer.clone(),
    );
    let refresh_claims = Claims::new(
        *user_id,
        email.to_string(),
        TokenClass::Refresh,
        issued_at,
        config.refresh_token_expiry,
        config.issuer.clone(),
    );

    Ok(TokenPair {
        access_token: sign(&access_claims, config)?,
        refresh_token: sign(&refresh_claims, config)?,
    })
}

fn sign(claims: &Claims, config: &JwtSettings) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

/// Validate a token and extract its claims.
///
/// Checks in order: signature against the signing key, expiry against
/// the current time (no leeway), then token class against
/// `expected_class`. Every failure collapses to the same
/// `AuthError::TokenInvalid` so a caller cannot tell a forged token
/// from an expired or wrong-class one.
pub fn validate_token(
    token: &str,
    expected_class: TokenClass,
    config: &JwtSettings,
) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("Token validation failed: {}", e);
        AuthError::TokenInvalid
    })?;

    if claims.token_use != expected_class {
        tracing::warn!(
            expected = %expected_class,
            presented = %claims.token_use,
            "Token class mismatch"
        );
        return Err(AuthError::TokenInvalid);
    }

    Ok(claims)
}

/// Rotate a refresh token into a brand-new token pair.
///
/// The presented token must validate as a refresh token; the new pair
/// is issued from its claims snapshot. There is no revocation list,
/// so the old refresh token stays usable until its own expiry.
pub fn rotate_tokens(refresh_token: &str, config: &JwtSettings) -> Result<TokenPair, AppError> {
    let claims = validate_token(refresh_token, TokenClass::Refresh, config)?;
    let user_id = claims.user_id()?;

    issue_token_pair(&user_id, &claims.email, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_config() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
            issuer: "test".to_string(),
        }
    }

    fn issue_pair(config: &JwtSettings) -> (Uuid, TokenPair) {
        let user_id = Uuid::new_v4();
        let pair = issue_token_pair(&user_id, "test@example.com", config)
            .expect("Failed to issue token pair");
        (user_id, pair)
    }

    #[test]
    fn issue_and_validate_pair() {
        let config = get_test_config();
        let (user_id, pair) = issue_pair(&config);

        let access = validate_token(&pair.access_token, TokenClass::Access, &config)
            .expect("Access token should validate");
        let refresh = validate_token(&pair.refresh_token, TokenClass::Refresh, &config)
            .expect("Refresh token should validate");

        assert_eq!(access.sub, user_id.to_string());
        assert_eq!(access.email, "test@example.com");
        assert_eq!(access.iss, "test");
        assert_eq!(refresh.sub, access.sub);
        // Same issuance baseline for both halves of the pair
        assert_eq!(access.iat, refresh.iat);
        assert_eq!(access.exp - access.iat, 900);
        assert_eq!(refresh.exp - refresh.iat, 604800);
    }

    #[test]
    fn class_mismatch_fails_before_expiry() {
        let config = get_test_config();
        let (_, pair) = issue_pair(&config);

        // Both tokens are well within their expiry windows; only the
        // class check can fail here.
        assert_eq!(
            validate_token(&pair.access_token, TokenClass::Refresh, &config).unwrap_err(),
            AuthError::TokenInvalid
        );
        assert_eq!(
            validate_token(&pair.refresh_token, TokenClass::Access, &config).unwrap_err(),
            AuthError::TokenInvalid
        );
    }

    #[test]
    fn expired_token_fails() {
        let mut config = get_test_config();
        config.access_token_expiry = -10;

        let (_, pair) = issue_pair(&config);
        let result = validate_token(&pair.access_token, TokenClass::Access, &config);

        assert_eq!(result.unwrap_err(), AuthError::TokenInvalid);
    }

    #[test]
    fn garbage_token_fails() {
        let config = get_test_config();
        let result = validate_token("invalid.token.here", TokenClass::Access, &config);

        assert!(result.is_err());
    }

    #[test]
    fn tampered_token_fails() {
        let config = get_test_config();
        let (_, pair) = issue_pair(&config);

        let tampered = format!("{}X", pair.access_token);
        let result = validate_token(&tampered, TokenClass::Access, &config);

        assert!(result.is_err());
    }

    #[test]
    fn token_signed_with_different_key_fails() {
        let config = get_test_config();
        let (_, pair) = issue_pair(&config);

        let mut other = get_test_config();
        other.secret = "another-secret-key-at-least-32-chars-xx".to_string();
        let result = validate_token(&pair.access_token, TokenClass::Access, &other);

        assert!(result.is_err());
    }

    #[test]
    fn wrong_issuer_fails() {
        let config = get_test_config();
        let (_, pair) = issue_pair(&config);

        let mut other = get_test_config();
        other.issuer = "wrong-issuer".to_string();
        let result = validate_token(&pair.access_token, TokenClass::Access, &other);

        assert!(result.is_err());
    }

    #[test]
    fn rotation_preserves_user_snapshot() {
        let config = get_test_config();
        let (user_id, pair) = issue_pair(&config);

        let rotated =
            rotate_tokens(&pair.refresh_token, &config).expect("Rotation should succeed");

        let claims = validate_token(&rotated.access_token, TokenClass::Access, &config)
            .expect("Rotated access token should validate");
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "test@example.com");

        // The rotated refresh token is a distinct credential
        assert_ne!(rotated.refresh_token, pair.refresh_token);
        assert!(validate_token(&rotated.refresh_token, TokenClass::Refresh, &config).is_ok());
    }

    #[test]
    fn rotation_rejects_access_token() {
        let config = get_test_config();
        let (_, pair) = issue_pair(&config);

        assert!(rotate_tokens(&pair.access_token, &config).is_err());
    }

    #[test]
    fn rotation_rejects_expired_refresh_token() {
        let mut config = get_test_config();
        config.refresh_token_expiry = -10;
        let (_, pair) = issue_pair(&config);

        config.refresh_token_expiry = 604800;
        assert!(rotate_tokens(&pair.refresh_token, &config).is_err());
    }

    #[test]
    fn rotation_rejects_tampered_refresh_token() {
        let config = get_test_config();
        let (_, pair) = issue_pair(&config);

        let tampered = format!("{}X", pair.refresh_token);
        assert!(rotate_tokens(&tampered, &config).is_err());
    }
}
