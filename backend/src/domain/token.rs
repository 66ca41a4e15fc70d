//! Signed bearer tokens.
//!
//! A token has the shape `v1.<payload>.<signature>` where both segments are
//! base64url without padding. The payload is JSON claims; the signature is
//! HMAC-SHA256 over `v1.<payload>` with the server key.
//!
//! Claims carry a credential stamp derived from the stored password hash,
//! so replacing the hash invalidates every token issued before the change.
//! There is no revocation list: a token is otherwise valid until `exp`.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::{PasswordHash, User, UserId};

const TOKEN_VERSION: &str = "v1";

type HmacSha256 = Hmac<Sha256>;

/// Reasons a token can be refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token could not be encoded: {0}")]
    Encoding(String),
}

/// Secret key material used to sign tokens. Wiped on drop.
#[derive(Clone)]
pub struct SigningKey(Zeroizing<Vec<u8>>);

impl SigningKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey({} bytes)", self.0.len())
    }
}

/// Fingerprint of a stored password hash embedded in issued tokens.
///
/// # Examples
/// ```
/// use todo_backend::domain::{PasswordHash, credential_stamp};
///
/// let a = PasswordHash::new("$2b$10$aaaa").unwrap();
/// let b = PasswordHash::new("$2b$10$bbbb").unwrap();
/// assert_eq!(credential_stamp(&a).len(), 64);
/// assert_ne!(credential_stamp(&a), credential_stamp(&b));
/// ```
pub fn credential_stamp(hash: &PasswordHash) -> String {
    hex::encode(Sha256::digest(hash.as_str().as_bytes()))
}

/// Claims carried inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    sub: UserId,
    email: String,
    stamp: String,
    iat: i64,
    exp: i64,
}

impl TokenClaims {
    /// User the token was issued to.
    pub fn subject(&self) -> &UserId {
        &self.sub
    }

    /// Email the user logged in with.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Credential stamp at issue time.
    pub fn stamp(&self) -> &str {
        self.stamp.as_str()
    }

    /// Expiry as seconds since the Unix epoch.
    pub fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// A freshly signed token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies tokens with one key and lifetime.
#[derive(Debug, Clone)]
pub struct TokenSigner {
    key: SigningKey,
    ttl: TimeDelta,
}

impl TokenSigner {
    pub fn new(key: SigningKey, ttl: TimeDelta) -> Self {
        Self { key, ttl }
    }

    /// Lifetime applied to newly issued tokens.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.key.0).map_err(|err| TokenError::Encoding(err.to_string()))
    }

    fn sign(&self, signing_input: &str) -> Result<String, TokenError> {
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }

    /// Issue a token for `user` valid from `now` for the configured lifetime.
    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let expires_at = now + self.ttl;
        let claims = TokenClaims {
            sub: *user.id(),
            email: user.email().as_ref().to_owned(),
            stamp: credential_stamp(user.password_hash()),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let payload = serde_json::to_vec(&claims)
            .map_err(|err| TokenError::Encoding(err.to_string()))?;
        let signing_input = format!("{TOKEN_VERSION}.{}", URL_SAFE_NO_PAD.encode(payload));
        let signature = self.sign(&signing_input)?;
        Ok(IssuedToken {
            token: format!("{signing_input}.{signature}"),
            expires_at,
        })
    }

    /// Check the signature and expiry of `token` and return its claims.
    ///
    /// The signature is checked before the payload is decoded, and the
    /// comparison is constant time.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let mut segments = token.split('.');
        let (Some(version), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed);
        };
        if version != TOKEN_VERSION {
            return Err(TokenError::Malformed);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = self.mac()?;
        mac.update(format!("{version}.{payload}").as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;
        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}
