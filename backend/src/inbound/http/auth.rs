//! Bearer credential extraction.
//!
//! [`AuthenticatedUser`] is an extractor: handlers that name it in their
//! signature only run once the `Authorization` header has been resolved to a
//! user through the [`RequestAuthenticator`](crate::domain::ports::RequestAuthenticator)
//! port.

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, UserId};

use super::state::HttpState;

/// Identity of the caller, resolved from a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    pub fn id(&self) -> &UserId {
        &self.0
    }
}

/// Pull the raw token out of the `Authorization` header.
///
/// A missing or blank header means the caller never logged in. The `Bearer`
/// scheme is optional and matched case-insensitively; a scheme with no token
/// after it is treated as missing.
fn bearer_token(headers: &HeaderMap) -> Result<String, Error> {
    let Some(raw) = headers.get(AUTHORIZATION) else {
        return Err(Error::unauthenticated());
    };
    let value = raw.to_str().map_err(|_| Error::invalid_credentials())?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };
    if token.is_empty() {
        return Err(Error::unauthenticated());
    }
    Ok(token.to_owned())
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req.headers());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let state = state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            let user = state.authenticator.authenticate(&token).await.inspect_err(|err| {
                debug!(code = ?err.code(), "bearer token rejected");
            })?;
            Ok(Self(user))
        })
    }
}
