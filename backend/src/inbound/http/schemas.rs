//! OpenAPI schemas for domain types.
//!
//! Domain types stay free of `ToSchema`; these wrappers describe their wire
//! shape and are registered under the domain names.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// A required field was absent or blank.
    #[schema(rename = "missing_field")]
    MissingField,
    /// A path identifier was malformed.
    #[schema(rename = "invalid_id")]
    InvalidId,
    /// The body could not be decoded.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "duplicate_email")]
    DuplicateEmail,
    #[schema(rename = "user_not_found")]
    UserNotFound,
    /// The bearer token or password did not verify.
    #[schema(rename = "invalid_credentials")]
    InvalidCredentials,
    /// No bearer token was presented.
    #[schema(rename = "unauthenticated")]
    Unauthenticated,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "missing_field")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "missing required field: text")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level context such as the offending field name.
    details: Option<serde_json::Value>,
}
