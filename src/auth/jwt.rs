//! JWT access and refresh tokens

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::{AuthConfig, ConfigValidationError};

/// Discriminates what a token may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claim set carried by every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Staff user id
    pub sub: String,
    /// Expiration (Unix timestamp, seconds)
    pub exp: i64,
    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

impl TokenClaims {
    /// Subject as a user id, `None` if the subject is not numeric
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

/// Access/refresh pair returned by login and refresh
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always "bearer"
    pub token_type: String,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("Token expiry is out of range")]
    ExpiryOutOfRange,
}

/// Issues and verifies tokens with the process-wide signing key.
///
/// Built once at startup; cloning is cheap enough to hand to every service.
#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenManager {
    pub fn new(secret: &str, algorithm: Algorithm, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Build from validated auth settings
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigValidationError> {
        config.validate()?;

        let access_ttl = Duration::try_minutes(config.access_token_expire_minutes)
            .ok_or(ConfigValidationError::InvalidTtl("access_token_expire_minutes"))?;
        let refresh_ttl = Duration::try_days(config.refresh_token_expire_days)
            .ok_or(ConfigValidationError::InvalidTtl("refresh_token_expire_days"))?;

        Ok(Self::new(
            config.jwt_secret.trim(),
            config.algorithm()?,
            access_ttl,
            refresh_ttl,
        ))
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn issue_access(&self, user_id: i32) -> Result<String, TokenError> {
        self.issue_at(user_id, TokenKind::Access, Utc::now())
    }

    pub fn issue_refresh(&self, user_id: i32) -> Result<String, TokenError> {
        self.issue_at(user_id, TokenKind::Refresh, Utc::now())
    }

    /// Issue a fresh access/refresh pair for a user
    pub fn issue_pair(&self, user_id: i32) -> Result<TokenPair, TokenError> {
        let now = Utc::now();
        Ok(TokenPair {
            access_token: self.issue_at(user_id, TokenKind::Access, now)?,
            refresh_token: self.issue_at(user_id, TokenKind::Refresh, now)?,
            token_type: "bearer".to_string(),
        })
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, user_id: i32, kind: TokenKind, now: DateTime<Utc>) -> Result<String, TokenError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };

        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;

        let claims = TokenClaims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            kind,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(TokenError::Signing)
    }

    /// Verify signature and expiry against the current time
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature and expiry against `now`.
    ///
    /// A token is accepted up to and including its `exp` second. The token
    /// kind is returned, not checked.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // expiry is checked below against the caller's clock
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })?
            .claims;

        if now.timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "k2V9w7QpZr4Lx8Nc1Bt6Hy3Jd5Mf0Gs!";

    fn manager() -> TokenManager {
        TokenManager::new(SECRET, Algorithm::HS256, Duration::minutes(20), Duration::days(7))
    }

    #[test]
    fn access_token_for_user_42_expires_after_ttl() {
        let tokens = manager();
        let issued = Utc::now();
        let token = tokens.issue_at(42, TokenKind::Access, issued).unwrap();

        let claims = tokens.verify_at(&token, issued).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.kind, TokenKind::Access);

        let later = issued + Duration::minutes(21);
        assert!(matches!(tokens.verify_at(&token, later), Err(TokenError::Expired)));
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let tokens = manager();
        let issued = Utc::now();
        let token = tokens.issue_at(7, TokenKind::Access, issued).unwrap();
        let expiry = issued + Duration::minutes(20);

        assert!(tokens.verify_at(&token, expiry - Duration::seconds(1)).is_ok());
        assert!(tokens.verify_at(&token, expiry).is_ok());
        assert!(matches!(
            tokens.verify_at(&token, expiry + Duration::seconds(1)),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn refresh_token_lives_for_configured_days() {
        let tokens = manager();
        let issued = Utc::now();
        let token = tokens.issue_at(3, TokenKind::Refresh, issued).unwrap();

        let claims = tokens.verify_at(&token, issued + Duration::days(6)).unwrap();
        assert_eq!(claims.kind, TokenKind::Refresh);
        assert_eq!(claims.exp - claims.iat, Duration::days(7).num_seconds());
        assert!(tokens.verify_at(&token, issued + Duration::days(8)).is_err());
    }

    #[test]
    fn pair_carries_both_kinds() {
        let tokens = manager();
        let pair = tokens.issue_pair(5).unwrap();
        assert_eq!(pair.token_type, "bearer");
        assert_eq!(tokens.verify(&pair.access_token).unwrap().kind, TokenKind::Access);
        assert_eq!(tokens.verify(&pair.refresh_token).unwrap().kind, TokenKind::Refresh);
    }

    #[test]
    fn rejects_token_signed_with_other_key() {
        let other = TokenManager::new(
            "another-secret-that-is-long-enough-1234",
            Algorithm::HS256,
            Duration::minutes(20),
            Duration::days(7),
        );
        let token = other.issue_access(1).unwrap();
        assert!(matches!(manager().verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn rejects_token_with_other_algorithm() {
        let other = TokenManager::new(SECRET, Algorithm::HS512, Duration::minutes(20), Duration::days(7));
        let token = other.issue_access(1).unwrap();
        assert!(matches!(manager().verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn rejects_garbage_and_tampered_tokens() {
        let tokens = manager();
        assert!(tokens.verify("").is_err());
        assert!(tokens.verify("not.a.jwt").is_err());

        let token = tokens.issue_access(1).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = "eyJzdWIiOiIxIiwiZXhwIjo0MTAyNDQ0ODAwLCJpYXQiOjAsInR5cGUiOiJhY2Nlc3MifQ";
        parts[1] = forged_payload;
        assert!(tokens.verify(&parts.join(".")).is_err());
    }

    #[test]
    fn from_config_rejects_weak_secret() {
        let config = AuthConfig {
            jwt_secret: "secret".to_string(),
            ..AuthConfig::default()
        };
        assert!(matches!(
            TokenManager::from_config(&config),
            Err(ConfigValidationError::WeakSecret)
        ));
    }

    #[test]
    fn from_config_uses_configured_ttls() {
        let config = AuthConfig {
            jwt_secret: SECRET.to_string(),
            access_token_expire_minutes: 5,
            refresh_token_expire_days: 2,
            ..AuthConfig::default()
        };
        let tokens = TokenManager::from_config(&config).unwrap();
        assert_eq!(tokens.access_ttl(), Duration::minutes(5));
        assert_eq!(tokens.refresh_ttl(), Duration::days(2));
    }

    #[test]
    fn oversized_ttl_fails_instead_of_panicking() {
        let tokens = TokenManager::new(
            SECRET,
            Algorithm::HS256,
            Duration::minutes(20),
            Duration::days(1_000_000_000),
        );
        assert!(matches!(tokens.issue_refresh(1), Err(TokenError::ExpiryOutOfRange)));
        assert!(matches!(tokens.issue_pair(1), Err(TokenError::ExpiryOutOfRange)));
    }

    #[test]
    fn from_config_rejects_ttl_beyond_limit() {
        let config = AuthConfig {
            jwt_secret: SECRET.to_string(),
            refresh_token_expire_days: 1_000_000_000,
            ..AuthConfig::default()
        };
        assert!(matches!(
            TokenManager::from_config(&config),
            Err(ConfigValidationError::TtlTooLong("refresh_token_expire_days", _))
        ));
    }
}
