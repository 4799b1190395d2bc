//! bcrypt password hashing.
//!
//! Hashing is CPU bound, so both operations run on the blocking thread pool.

use acuda_core::AppError;

/// Cost used for stored account passwords (compatible with existing hashes).
pub const DEFAULT_COST: u32 = 12;

/// Cost bounds accepted by bcrypt.
const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub async fn hash(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// A malformed stored hash counts as a mismatch.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?;

        match matches {
            Ok(matches) => Ok(matches),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = PasswordHasher::with_cost(4);
        let hash = hasher.hash("secret123").await.unwrap();
        assert!(hash.starts_with("$2"));
        assert!(hasher.verify("secret123", &hash).await.unwrap());
        assert!(!hasher.verify("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_mismatch() {
        let hasher = PasswordHasher::with_cost(4);
        assert!(!hasher.verify("secret123", "not-a-hash").await.unwrap());
    }

    #[test]
    fn test_cost_is_clamped() {
        assert_eq!(PasswordHasher::with_cost(1).cost, MIN_COST);
        assert_eq!(PasswordHasher::with_cost(99).cost, MAX_COST);
        assert_eq!(PasswordHasher::default().cost, DEFAULT_COST);
    }
}
