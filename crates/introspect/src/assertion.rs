//! Private-key JWT client assertions (RFC 7523 §2.2).
//!
//! Every introspection call authenticates with a freshly signed assertion.
//! Assertions are never cached or reused.

use crate::{error::AuthError, keystore::KeyMaterial};
use chrono::{DateTime, Utc};
use jsonwebtoken::Header;
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use uuid::Uuid;

/// `client_assertion_type` value for JWT bearer client assertions.
pub const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Validity window of an assertion.
pub const DEFAULT_ASSERTION_LIFETIME: Duration = Duration::from_secs(60);

/// Who the assertion speaks for and who it is addressed to.
#[derive(Clone, Debug)]
pub struct AssertionConfig {
    /// OAuth client identifier, used for both `iss` and `sub`.
    pub client_id: String,
    /// Expected audience, usually the introspection endpoint or issuer URL.
    pub audience: String,
    /// `exp - iat`.
    pub lifetime: Duration,
}

impl AssertionConfig {
    pub fn new(client_id: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            audience: audience.into(),
            lifetime: DEFAULT_ASSERTION_LIFETIME,
        }
    }
}

/// Claims of a client assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// A signed, single-use client assertion.
pub struct ClientAssertion {
    claims: AssertionClaims,
    serialized: String,
}

impl ClientAssertion {
    /// Build and sign an assertion issued now.
    pub fn build(config: &AssertionConfig, key: &KeyMaterial) -> Result<Self, AuthError> {
        Self::build_at(config, key, Utc::now())
    }

    /// Build and sign an assertion issued at `now`.
    pub fn build_at(
        config: &AssertionConfig,
        key: &KeyMaterial,
        now: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let iat = now.timestamp();
        // saturate on absurd lifetimes
        let lifetime = i64::try_from(config.lifetime.as_secs()).unwrap_or(i64::MAX);
        let claims = AssertionClaims {
            iss: config.client_id.clone(),
            sub: config.client_id.clone(),
            aud: config.audience.clone(),
            iat,
            exp: iat.saturating_add(lifetime),
            jti: Uuid::new_v4().to_string(),
        };

        let mut header = Header::new(key.algorithm());
        header.typ = Some("JWT".into());
        header.kid = key.kid().map(String::from);

        let serialized = jsonwebtoken::encode(&header, &claims, key.encoding_key())
            .map_err(AuthError::AssertionSigning)?;
        Ok(Self { claims, serialized })
    }

    pub fn claims(&self) -> &AssertionClaims {
        &self.claims
    }

    pub fn jti(&self) -> &str {
        &self.claims.jti
    }

    /// Compact JWS serialization, the `client_assertion` form value.
    pub fn as_str(&self) -> &str {
        &self.serialized
    }
}

impl fmt::Debug for ClientAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientAssertion")
            .field("claims", &self.claims)
            .field("serialized", &"[REDACTED]")
            .finish()
    }
}
