//! Session token generation and verification

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use super::AuthError;

/// Fixed session lifetime. Sessions are never silently renewed; after expiry
/// the user authenticates again.
pub const SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Session token payload
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Principal id
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: String,
    /// Issued at (UTC unix seconds)
    pub iat: u64,
    /// Expiration (UTC unix seconds)
    pub exp: u64,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Sign a session token for a principal. HS256 only, 24-hour expiry.
pub fn generate_token(
    user_id: &str,
    email: &str,
    name: &str,
    role: &str,
    secret: &str,
) -> Result<String, AuthError> {
    let now = unix_now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        iat: now,
        exp: now + SESSION_TTL_SECS,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenSigning(e.to_string()))
}

/// Verify and decode a session token.
///
/// Returns `None` on any failure: malformed token, wrong signature, wrong
/// algorithm, or expiry. A token whose `exp` equals the current second is
/// already expired. Callers treat `None` uniformly as "not logged in".
pub fn verify_token(token: &str, secret: &str) -> Option<Claims> {
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()?;

    // exp == now counts as expired, not borderline-valid
    if token_data.claims.exp <= unix_now() {
        return None;
    }

    Some(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_minimum_32_characters_long";

    #[test]
    fn test_generate_and_verify_roundtrip() {
        let token = generate_token("u1", "ann@example.com", "Ann", "admin", SECRET).unwrap();

        let claims = verify_token(&token, SECRET).expect("token should verify");
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.email, "ann@example.com");
        assert_eq!(claims.name, "Ann");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp, claims.iat + SESSION_TTL_SECS);
    }

    #[test]
    fn test_wrong_secret_yields_none() {
        let token = generate_token("u1", "ann@example.com", "Ann", "admin", SECRET).unwrap();
        assert!(verify_token(&token, "completely_different_secret_32chars!").is_none());
    }

    #[test]
    fn test_malformed_token_yields_none() {
        assert!(verify_token("not.a.token", SECRET).is_none());
        assert!(verify_token("", SECRET).is_none());
    }

    #[test]
    fn test_exp_equal_to_now_is_expired() {
        let now = unix_now();
        let claims = Claims {
            sub: "u1".to_string(),
            email: "ann@example.com".to_string(),
            name: "Ann".to_string(),
            role: "admin".to_string(),
            iat: now - 10,
            exp: now,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, SECRET).is_none());
    }

    #[test]
    fn test_expired_token_yields_none() {
        let now = unix_now();
        let claims = Claims {
            sub: "u1".to_string(),
            email: "ann@example.com".to_string(),
            name: "Ann".to_string(),
            role: "admin".to_string(),
            iat: now - 100_000,
            exp: now - 100,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, SECRET).is_none());
    }
}
