//! bcrypt implementation of the [`PasswordHasher`] port.
//!
//! bcrypt is deliberately slow, so both operations run on tokio's blocking
//! pool instead of an async worker.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Work factor used for new hashes.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// bcrypt-backed password hasher.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::with_cost(DEFAULT_BCRYPT_COST)
    }
}

impl BcryptPasswordHasher {
    /// Hasher with an explicit work factor, clamped to bcrypt's valid range.
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.clamp(4, 31),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let password = Zeroizing::new(password.to_owned());
        let cost = self.cost;
        let encoded = tokio::task::spawn_blocking(move || bcrypt::hash(password.as_str(), cost))
            .await
            .map_err(|err| PasswordHasherError::hash(err.to_string()))?
            .map_err(|err| PasswordHasherError::hash(err.to_string()))?;
        PasswordHash::new(encoded).map_err(|err| PasswordHasherError::hash(err.to_string()))
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.as_str().to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password.as_str(), &hash))
            .await
            .map_err(|err| PasswordHasherError::verify(err.to_string()))?
            .map_err(|err| PasswordHasherError::verify(err.to_string()))
    }
}
