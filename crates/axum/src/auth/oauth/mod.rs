//! OAuth 2.0 resource server plumbing.
//!
//! - **Challenges**: `WWW-Authenticate` headers for 401 and 400 responses per
//!   [RFC 6750 §3](https://datatracker.ietf.org/doc/html/rfc6750#section-3).
//!
//! - **JWKS** (with the `introspection` feature): publishes the public half
//!   of the client-assertion signing key at `/.well-known/jwks.json`, so the
//!   authorization server can be pointed at a JWKS URL instead of a pasted
//!   certificate.
//!
//! # Example
//!
//! ```rust,ignore
//! use introspect_axum::auth::{AuthLayer, BearerAuth};
//! use introspect_axum::auth::oauth::jwks_router;
//!
//! let app = axum::Router::new()
//!     .route("/api/me", axum::routing::get(me))
//!     .layer(AuthLayer::new(BearerAuth::new(authenticator.clone())).with_realm("resource-api"))
//!     .merge(jwks_router(authenticator.key_material()));
//! ```

mod challenge;

#[cfg(feature = "introspection")]
mod jwks;

pub use challenge::{ChallengeConfig, www_authenticate};

#[cfg(feature = "introspection")]
pub use jwks::{JWKS_PATH, jwks_router};
