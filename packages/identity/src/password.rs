//! Argon2 password hashes stored as PHC strings.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::IdentityError;

/// A stored password in PHC string format (`$argon2id$v=19$...`).
#[derive(Debug, Clone)]
pub struct PasswordHash {
    phc: String,
}

impl PasswordHash {
    /// Hashes `password` with Argon2 under a fresh random salt.
    pub fn new(password: &str) -> Result<Self, IdentityError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| IdentityError::PasswordHash {
                message: e.to_string(),
            })?
            .to_string();
        Ok(Self { phc })
    }

    /// Whether `password` matches the stored hash.
    ///
    /// A stored hash that no longer parses never matches.
    pub fn verify(&self, password: &str) -> bool {
        let parsed = match argon2::PasswordHash::new(&self.phc) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::error!("Stored password hash is malformed: {e}");
                return false;
            }
        };
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => true,
            Err(argon2::password_hash::Error::Password) => false,
            Err(e) => {
                log::error!("Password verification failed: {e}");
                false
            }
        }
    }
}
