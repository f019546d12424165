//! bcrypt hashing, run on the blocking pool

use crate::{Result, WeatherWiseError};

pub async fn hash_password(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| WeatherWiseError::internal(format!("Hashing task failed: {e}")))?
        .map_err(|e| WeatherWiseError::internal(format!("Failed to hash password: {e}")))
}

/// Check a password against a stored hash. A malformed hash counts as a
/// mismatch.
pub async fn verify_password(password: String, hash: String) -> Result<bool> {
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| WeatherWiseError::internal(format!("Verification task failed: {e}")))?;

    match verified {
        Ok(matches) => Ok(matches),
        Err(e) => {
            tracing::warn!("Stored password hash could not be checked: {}", e);
            Ok(false)
        }
    }
}
