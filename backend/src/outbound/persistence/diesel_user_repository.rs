//! PostgreSQL-backed `UserRepository`.
//!
//! Email uniqueness is enforced by the `users_email_key` index; a losing
//! concurrent insert surfaces as `DuplicateEmail`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, PasswordHash, User, UserId, UserName};

use super::diesel_error_mapping::DieselFailure;
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DieselFailure>, email: &str) -> UserPersistenceError {
    match failure.into() {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
        DieselFailure::UniqueViolation => UserPersistenceError::duplicate_email(email),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let corrupt = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    let name = UserName::new(&row.name).map_err(corrupt)?;
    let email = EmailAddress::new(&row.email).map_err(corrupt)?;
    let password_hash = PasswordHash::new(row.password_hash.clone()).map_err(corrupt)?;
    Ok(User::new(
        UserId::from(row.id),
        name,
        email,
        password_hash,
        row.created_at,
    )
    .with_updated_at(row.updated_at))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let email = user.email().as_ref();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(err, email))?;

        let row = NewUserRow {
            id: *user.id().as_uuid(),
            name: user.name().as_ref(),
            email,
            password_hash: user.password_hash().as_str(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_failure(err, email))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(err, email.as_ref()))?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(err, email.as_ref()))?;

        row.map(row_to_user).transpose()
    }
}
