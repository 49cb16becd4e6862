//! Salted one-way password hashing with bcrypt
//!
//! bcrypt only reads the first 72 bytes of its input (NUL terminator included).
//! Longer passwords are refused instead of being silently cut short.

use bcrypt::BcryptError;
use cinegraph_core::{Error, Result};

/// Longest password bcrypt hashes without truncation, in bytes
pub const MAX_PASSWORD_BYTES: usize = 71;

/// Hash a password using bcrypt with the given work factor
///
/// Fails with [`Error::InvalidInput`] when the password is longer than
/// [`MAX_PASSWORD_BYTES`].
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::non_truncating_hash(password, cost).map_err(|e| match e {
        BcryptError::Truncation(_) => Error::invalid_input(format!(
            "password must be at most {MAX_PASSWORD_BYTES} bytes"
        )),
        e => Error::password(format!("Failed to hash password: {e}")),
    })
}

/// Verify a password against a hash
///
/// A mismatch is `Ok(false)`, and so is a password too long to have been
/// hashed. An error means the stored hash itself is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    match bcrypt::non_truncating_verify(password, hash) {
        Ok(matches) => Ok(matches),
        Err(BcryptError::Truncation(_)) => Ok(false),
        Err(e) => Err(Error::password(format!("Invalid password hash: {e}"))),
    }
}

/// [`hash_password`] on the blocking thread pool
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| Error::password(format!("Password hashing task failed: {e}")))?
}

/// [`verify_password`] on the blocking thread pool
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| Error::password(format!("Password verification task failed: {e}")))?
}
