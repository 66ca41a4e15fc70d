//! Domain primitives, services and ports.
//!
//! Nothing in here knows about HTTP or SQL. Inbound adapters call the
//! driving ports in [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failure taxonomy.
//! - [`User`], [`Todo`] and their validated value types.
//! - [`TokenSigner`]: issues and verifies bearer tokens.
//! - [`OwnershipGuard`]: per-item ownership checks.
//! - [`AccountService`] and [`TodoService`]: the use-case implementations.

mod account_service;
pub mod auth;
pub mod error;
pub mod ownership;
pub mod ports;
pub mod todo;
mod todo_service;
pub mod token;
mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{CredentialValidationError, LoginCredentials, Registration};
pub use self::error::{Error, ErrorCode};
pub use self::ownership::{OwnershipGuard, OwnershipPolicy};
pub use self::todo::{Todo, TodoId, TodoPatch, TodoText, TodoValidationError};
pub use self::todo_service::TodoService;
pub use self::token::{
    IssuedToken, SigningKey, TokenClaims, TokenError, TokenSigner, credential_stamp,
};
pub use self::trace_id::TraceId;
pub use self::user::{EmailAddress, PasswordHash, User, UserId, UserName, UserValidationError};

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";
