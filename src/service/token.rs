//! Session Token Service
//!
//! Issues and verifies the signed, time-limited session tokens that assert
//! the bearer's account identity.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from token issuance and verification
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token could not be signed
    #[error("Token generation failed: {0}")]
    Generation(String),

    /// Bad signature, malformed token, or expired
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// JWT claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - the account email
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Verified bearer identity extracted from a session token
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    /// Account email the token was issued for
    pub email: String,

    /// When the token expires
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens with a process-wide secret
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    expires_in: Duration,
}

impl TokenService {
    /// Create a token service with the standard 1 hour expiry
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            expires_in: Duration::hours(1),
        }
    }

    /// Create a token service with a custom expiry (used by tests)
    pub fn with_expiration(secret: String, expires_in: Duration) -> Self {
        Self { secret, expires_in }
    }

    /// Issue a signed token embedding the account email as subject
    pub fn issue(&self, email: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: email.to_string(),
            exp: (now + self.expires_in).timestamp(),
            iat: now.timestamp(),
        };

        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(self.secret.as_ref());

        encode(&header, &claims, &encoding_key).map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Verify a token and extract the bearer identity
    pub fn verify(&self, token: &str) -> Result<SessionIdentity, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let decoding_key = DecodingKey::from_secret(self.secret.as_ref());

        let claims = decode::<SessionClaims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        Ok(SessionIdentity {
            email: claims.sub,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> TokenService {
        TokenService::new("test_secret_key".to_string())
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let service = test_service();
        let token = service.issue("alice@example.com").unwrap();
        let identity = service.verify(&token).unwrap();

        assert_eq!(identity.email, "alice@example.com");
        assert!(identity.expires_at > Utc::now());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service =
            TokenService::with_expiration("test_secret_key".to_string(), Duration::hours(-2));
        let token = service.issue("alice@example.com").unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = test_service().issue("alice@example.com").unwrap();
        let other = TokenService::new("different_secret".to_string());

        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(test_service().verify("not.a.token").is_err());
        assert!(test_service().verify("").is_err());
    }
}
