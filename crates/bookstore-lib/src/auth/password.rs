// ============================
// bookstore-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng}, Scrypt};
use serde::Deserialize;
use zeroize::Zeroize;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Password complexity requirements
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordRequirements {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
            require_special: false,
        }
    }
}

/// Hash a password using scrypt. The salt is freshly generated on every
/// call, so two hashes of the same input differ while both still verify.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password(plain.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored hash. An unparsable hash verifies
/// false rather than erroring, so the caller sees a plain mismatch.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// Check if a password meets the complexity requirements
pub fn validate_password_strength(password: &str, requirements: &PasswordRequirements) -> bool {
    if password.len() < requirements.min_length {
        return false;
    }

    if requirements.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
        return false;
    }

    if requirements.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
        return false;
    }

    if requirements.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    if requirements.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
        return false;
    }

    true
}

/// Hash a password and zeroize the plaintext buffer afterwards.
pub fn hash_password_secure(plain: &mut String) -> anyhow::Result<String> {
    let hash = hash_password(plain)?;
    plain.zeroize();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret1!").unwrap();
        assert!(verify_password(&hash, "secret1!"));
        assert!(!verify_password(&hash, "wrong_password"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("secret1!").unwrap();
        let second = hash_password("secret1!").unwrap();
        assert_ne!(first, second);
        assert!(verify_password(&first, "secret1!"));
        assert!(verify_password(&second, "secret1!"));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("not-a-phc-string", "anything"));
        assert!(!verify_password("", "anything"));
    }

    #[test]
    fn test_password_strength() {
        let defaults = PasswordRequirements::default();
        assert!(validate_password_strength("longenough", &defaults));
        assert!(!validate_password_strength("short", &defaults));

        let strict = PasswordRequirements {
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special: true,
        };
        assert!(validate_password_strength("Str0ng!pw", &strict));
        assert!(!validate_password_strength("weakpassword", &strict));
    }

    #[test]
    fn test_hash_password_secure_zeroizes() {
        let mut plain = String::from("secret1!");
        let hash = hash_password_secure(&mut plain).unwrap();
        assert!(plain.is_empty());
        assert!(verify_password(&hash, "secret1!"));
    }
}
