//! Driving port that resolves a presented bearer token to a user.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

/// Re-validates a token on every request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestAuthenticator: Send + Sync {
    /// Resolve `token` to the identity it was issued for.
    ///
    /// Fails with `InvalidCredentials` for any token that does not verify or
    /// no longer matches the stored account.
    async fn authenticate(&self, token: &str) -> Result<UserId, Error>;
}
