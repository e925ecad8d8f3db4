//! Bearer token extraction (RFC 6750 §2.1).
//!
//! Pulls the token out of `Authorization: Bearer <token>` and delegates
//! validation to a [`Validator`](super::Validator).

use crate::auth::{Authenticator, Rejection, Validator};
use http::StatusCode;
use std::fmt;

/// Bearer token authenticator.
///
/// The scheme is matched case-insensitively. Validator errors are logged and
/// replaced with a generic message before they reach the client.
#[derive(Clone)]
pub struct BearerAuth<V> {
    validator: V,
}

impl<V> BearerAuth<V> {
    pub fn new(validator: V) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }
}

/// Why a request failed bearer authentication.
#[derive(Debug)]
pub enum BearerError<E> {
    /// No `Authorization` header, or one with another scheme.
    Missing,
    /// A bearer header that cannot carry a token.
    Malformed,
    /// The validator rejected the token.
    Invalid(E),
}

impl<E> fmt::Display for BearerError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BearerError::Missing => f.write_str("bearer token required"),
            BearerError::Malformed => f.write_str("malformed Authorization header"),
            BearerError::Invalid(_) => f.write_str("invalid bearer token"),
        }
    }
}

impl<E: Send> Rejection for BearerError<E> {
    fn status(&self) -> StatusCode {
        match self {
            BearerError::Malformed => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            BearerError::Missing => None,
            BearerError::Malformed => Some("invalid_request"),
            BearerError::Invalid(_) => Some("invalid_token"),
        }
    }
}

/// Extract the bearer token from a request.
pub fn bearer_token<E>(parts: &http::request::Parts) -> Result<&str, BearerError<E>> {
    let header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .ok_or(BearerError::Missing)?;
    let value = header.to_str().map_err(|_| BearerError::Malformed)?;
    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(BearerError::Missing);
    }
    match token.trim() {
        "" => Err(BearerError::Malformed),
        token => Ok(token),
    }
}

impl<V> Authenticator for BearerAuth<V>
where
    V: Validator,
{
    type Claims = V::Claims;
    type Error = BearerError<V::Error>;

    async fn authenticate(
        &self,
        parts: &http::request::Parts,
    ) -> Result<Self::Claims, Self::Error> {
        let token = bearer_token(parts)?;
        self.validator.validate(token).await.map_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
            BearerError::Invalid(e)
        })
    }
}
