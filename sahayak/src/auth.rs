//! Password hashing and JWT issuance for farmer accounts.
//!
//! Access and refresh tokens are HS256 JWTs signed with separate secrets.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::{Result, SahayakError};

const BCRYPT_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| SahayakError::Internal(format!("bcrypt hash: {e}")))
}

/// Returns `true` if the password matches, `false` otherwise.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| SahayakError::Internal(format!("bcrypt verify: {e}")))
}

/// Claims embedded in both access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject, the user id.
    pub sub: String,
    pub email: String,
    /// Expiry as a Unix timestamp in seconds.
    pub exp: usize,
}

/// An access/refresh token pair for one user.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn sign(user_id: &str, email: &str, secret: &str, expires_in_secs: u64) -> Result<String> {
    let exp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .saturating_add(expires_in_secs) as usize;

    let claims = TokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| SahayakError::Auth(format!("JWT encode: {e}")))
}

fn validate(token: &str, secret: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(), // validates exp, requires HS256
    )
    .map_err(|e| SahayakError::Auth(format!("JWT validation: {e}")))?;

    Ok(token_data.claims)
}

pub fn issue_token_pair(config: &AuthConfig, user_id: &str, email: &str) -> Result<TokenPair> {
    Ok(TokenPair {
        access_token: sign(
            user_id,
            email,
            &config.access_secret,
            config.access_expiration_secs,
        )?,
        refresh_token: sign(
            user_id,
            email,
            &config.refresh_secret,
            config.refresh_expiration_secs,
        )?,
    })
}

pub fn verify_access_token(config: &AuthConfig, token: &str) -> Result<TokenClaims> {
    validate(token, &config.access_secret)
}

pub fn verify_refresh_token(config: &AuthConfig, token: &str) -> Result<TokenClaims> {
    validate(token, &config.refresh_secret)
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Result<&str> {
    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| SahayakError::Auth("missing Bearer prefix".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            access_secret: "access-secret".to_string(),
            refresh_secret: "refresh-secret".to_string(),
            access_expiration_secs: 3600,
            refresh_expiration_secs: 2592000,
        }
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("kisan123").unwrap();
        assert!(verify_password("kisan123", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_token_pair_round_trip() {
        let config = test_config();
        let pair = issue_token_pair(&config, "user-1", "farmer@example.com").unwrap();

        let claims = verify_access_token(&config, &pair.access_token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "farmer@example.com");

        let claims = verify_refresh_token(&config, &pair.refresh_token).unwrap();
        assert_eq!(claims.sub, "user-1");
    }

    #[test]
    fn test_secrets_are_not_interchangeable() {
        let config = test_config();
        let pair = issue_token_pair(&config, "user-1", "farmer@example.com").unwrap();

        assert!(verify_access_token(&config, &pair.refresh_token).is_err());
        assert!(verify_refresh_token(&config, &pair.access_token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = test_config();
        let claims = TokenClaims {
            sub: "user-1".to_string(),
            email: "farmer@example.com".to_string(),
            exp: 1000, // long in the past
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.access_secret.as_bytes()),
        )
        .unwrap();
        assert!(verify_access_token(&config, &token).is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(bearer_token("Token abc").is_err());
        assert!(bearer_token("abc").is_err());
    }
}
