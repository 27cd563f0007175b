//! Password hashing with Argon2id

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AppError, AppResult};

/// Hash a password into a PHC string with a fresh random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored digest.
///
/// A digest that does not parse counts as a mismatch.
pub fn verify_password(password: &str, digest: &str) -> bool {
    match PasswordHash::new(digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password digest is malformed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_plain_empty_and_unicode() {
        for password in ["correct horse battery staple", "", "пароль-Вологда-📚"] {
            let digest = hash_password(password).unwrap();
            assert!(verify_password(password, &digest), "{password:?}");
            assert!(!verify_password("something else", &digest));
        }
    }

    #[test]
    fn salts_every_hash() {
        let first = hash_password("librarian").unwrap();
        let second = hash_password("librarian").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
    }

    #[test]
    fn flipped_bit_in_digest_fails() {
        let digest = hash_password("librarian").unwrap();
        let mut bytes = digest.into_bytes();
        let index = bytes.len() - 10;
        bytes[index] ^= 0x01;
        let tampered = String::from_utf8(bytes).unwrap();
        assert!(!verify_password("librarian", &tampered));
    }

    #[test]
    fn malformed_digest_is_a_mismatch() {
        assert!(!verify_password("librarian", ""));
        assert!(!verify_password("librarian", "not-a-phc-string"));
        assert!(!verify_password("librarian", "$2b$12$legacybcryptdigestvalue"));
    }
}
