use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use validator::ValidateEmail;

use super::AuthError;

/// Outcome of checking a candidate password against the account rules.
/// Collects every violated rule so the caller can render a full checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCheck {
    pub valid: bool,
    pub errors: Vec<&'static str>,
}

pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Hash a password using Argon2id with OWASP-recommended parameters
/// - Memory: 65536 KB (64 MB)
/// - Iterations: 3
/// - Parallelism: 4
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let params =
        Params::new(65536, 3, 4, None).map_err(|e| AuthError::Hashing(e.to_string()))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against an Argon2 hash
///
/// A wrong password is `Ok(false)`; only an unparseable stored hash is an
/// error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(_) => Ok(false),
    }
}

/// Check a candidate password against all account rules at once.
pub fn validate_password(password: &str) -> PasswordCheck {
    let mut errors = Vec::new();

    if password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one number");
    }

    PasswordCheck {
        valid: errors.is_empty(),
        errors,
    }
}

/// Structural email check (`local@domain.tld` shape). Does not verify
/// deliverability. The HTML5 grammar used by the validator crate accepts
/// dotless domains, which real organizer addresses never have.
pub fn validate_email(value: &str) -> bool {
    if !value.validate_email() {
        return false;
    }
    value
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("Password123").unwrap();
        assert_ne!(hash, "Password123");
        assert!(verify_password("Password123", &hash).unwrap());
        assert!(!verify_password("WrongPass123", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("Password123", "not-a-hash").is_err());
    }

    #[test]
    fn test_valid_password_has_no_errors() {
        let check = validate_password("Password123");
        assert!(check.valid);
        assert!(check.errors.is_empty());
    }

    #[test]
    fn test_single_violation_names_one_rule() {
        let check = validate_password("password123"); // no uppercase
        assert!(!check.valid);
        assert_eq!(check.errors.len(), 1);
        assert!(check.errors[0].contains("uppercase"));
    }

    #[test]
    fn test_all_rules_reported_at_once() {
        // Too short, no uppercase, no lowercase, no digit
        let check = validate_password("!!!");
        assert!(!check.valid);
        assert_eq!(check.errors.len(), 4);
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("organizer@example.com"));
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("missing@domain"));
        assert!(!validate_email("@example.com"));
    }
}
