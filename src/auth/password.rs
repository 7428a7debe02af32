//! Admin password hashing (bcrypt, random salt per call).

use super::AuthError;

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// A mismatch and an unreadable stored hash both read as bad credentials.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    match bcrypt::verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::InvalidCredentials),
        Err(e) => {
            tracing::warn!("Stored password hash could not be verified: {}", e);
            Err(AuthError::InvalidCredentials)
        }
    }
}
