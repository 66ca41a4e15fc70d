//! Account use-cases: registration, login and per-request authentication.
//!
//! One service backs all three driving ports because they share the user
//! store, the password hasher and the token signer.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    LoginService, PasswordHasher, PasswordHasherError, RegistrationService, RequestAuthenticator,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    EmailAddress, Error, IssuedToken, LoginCredentials, Registration, TokenSigner, User, UserId,
    credential_stamp,
};

/// Account service implementing the authentication driving ports.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    signer: Arc<TokenSigner>,
    clock: Arc<dyn Clock>,
}

impl<U, H> AccountService<U, H> {
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        signer: Arc<TokenSigner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            signer,
            clock,
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail { .. } => Error::duplicate_email(),
        UserPersistenceError::Connection { message } => {
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn find_user(&self, email: &EmailAddress) -> Result<Option<User>, Error> {
        self.users
            .find_by_email(email)
            .await
            .map_err(map_user_error)
    }
}

#[async_trait]
impl<U, H> RegistrationService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: &Registration) -> Result<UserId, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hasher_error)?;
        let user = User::new(
            UserId::random(),
            registration.name().clone(),
            registration.email().clone(),
            password_hash,
            self.clock.utc(),
        );
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id(), "registered user");
        Ok(*user.id())
    }
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedToken, Error> {
        let user = self
            .find_user(credentials.email())
            .await?
            .ok_or_else(Error::user_not_found)?;
        let verified = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await
            .map_err(map_hasher_error)?;
        if !verified {
            debug!(user_id = %user.id(), "password mismatch");
            return Err(Error::invalid_credentials());
        }
        let issued = self
            .signer
            .issue(&user, self.clock.utc())
            .map_err(|err| Error::internal(format!("failed to issue token: {err}")))?;
        info!(user_id = %user.id(), expires_at = %issued.expires_at, "issued token");
        Ok(issued)
    }
}

#[async_trait]
impl<U, H> RequestAuthenticator for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, token: &str) -> Result<UserId, Error> {
        let claims = self.signer.verify(token, self.clock.utc()).map_err(|err| {
            debug!(reason = %err, "rejected bearer token");
            Error::invalid_credentials()
        })?;
        let email = EmailAddress::new(claims.email()).map_err(|_| Error::invalid_credentials())?;
        let Some(user) = self.find_user(&email).await? else {
            debug!(user_id = %claims.subject(), "token names an unknown account");
            return Err(Error::invalid_credentials());
        };
        if user.id() != claims.subject() {
            debug!(user_id = %claims.subject(), "token subject does not own the email");
            return Err(Error::invalid_credentials());
        }
        if credential_stamp(user.password_hash()) != claims.stamp() {
            debug!(user_id = %user.id(), "token predates a credential change");
            return Err(Error::invalid_credentials());
        }
        Ok(*user.id())
    }
}
