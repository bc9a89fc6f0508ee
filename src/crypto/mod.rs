//! Password storage and comparison.
//!
//! Two storage schemes are supported. `Plaintext` keeps the password as-is
//! and compares it for exact equality. `Argon2` keeps a PHC string and
//! verifies against it. Whichever scheme is active, a stored value that
//! cannot be interpreted is an error rather than a mismatch.

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use subtle::ConstantTimeEq;

use crate::config::PasswordScheme;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("stored password is not a valid PHC string: {0}")]
    MalformedHash(password_hash::Error),
    #[error("password hashing failed: {0}")]
    Hashing(password_hash::Error),
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(PasswordError::Hashing)?;
    Ok(hash.to_string())
}

/// Exact, case-sensitive equality. Equal-length inputs are compared in constant time.
pub fn plaintext_matches(submitted: &str, stored: &str) -> bool {
    let submitted = submitted.as_bytes();
    let stored = stored.as_bytes();
    submitted.len() == stored.len() && submitted.ct_eq(stored).into()
}

/// Value to persist for `password` under the given scheme.
pub fn encode_for_storage(scheme: PasswordScheme, password: &str) -> Result<String, PasswordError> {
    match scheme {
        PasswordScheme::Plaintext => Ok(password.to_string()),
        PasswordScheme::Argon2 => hash_password(password),
    }
}

/// Check a submitted password against the stored value.
pub fn verify_password(
    scheme: PasswordScheme,
    submitted: &str,
    stored: &str,
) -> Result<bool, PasswordError> {
    match scheme {
        PasswordScheme::Plaintext => Ok(plaintext_matches(submitted, stored)),
        PasswordScheme::Argon2 => {
            let parsed = PasswordHash::new(stored).map_err(PasswordError::MalformedHash)?;
            match Argon2::default().verify_password(submitted.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(e) => Err(PasswordError::MalformedHash(e)),
            }
        }
    }
}
