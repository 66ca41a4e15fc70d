//! Driving port for login.
//!
//! Inbound adapters exchange credentials for a bearer token here without
//! knowing how users are stored or how passwords are hashed.

use async_trait::async_trait;

use crate::domain::{Error, IssuedToken, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and issue a signed token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedToken, Error>;
}
