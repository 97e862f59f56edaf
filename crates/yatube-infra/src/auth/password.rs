//! Account password storage.
//!
//! Passwords are kept as Argon2id PHC strings (`$argon2id$v=19$...`) with a
//! fresh salt per account.

use argon2::Argon2;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

use yatube_core::ports::{AuthError, PasswordService};

/// Argon2id password hashing with the crate's default cost.
#[derive(Default)]
pub struct Argon2PasswordService {
    hasher: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// A stored hash that cannot be read never matches. The login fails
    /// like a wrong password and the broken row is logged.
    fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is unreadable");
                return Ok(false);
            }
        };

        match self.hasher.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash cannot be checked");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashes_are_salted_argon2id() {
        let service = Argon2PasswordService::new();

        let first = service.hash("war-and-peace").unwrap();
        let second = service.hash("war-and-peace").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(service.verify("war-and-peace", &first).unwrap());
        assert!(service.verify("war-and-peace", &second).unwrap());
        assert!(!service.verify("anna-karenina", &first).unwrap());
    }

    #[test]
    fn test_unreadable_stored_hash_never_matches() {
        let service = Argon2PasswordService::new();

        assert!(!service.verify("war-and-peace", "war-and-peace").unwrap());
        assert!(!service.verify("war-and-peace", "").unwrap());
    }
}
