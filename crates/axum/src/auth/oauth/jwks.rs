//! JSON Web Key Set for the client-assertion signing key (RFC 7517 §5).
//!
//! ```rust,ignore
//! use introspect_axum::auth::oauth::jwks_router;
//!
//! let app = axum::Router::new()
//!     .route("/api/me", axum::routing::get(me))
//!     .merge(jwks_router(&key));
//! ```

use axum::{Json, response::IntoResponse};
use introspect::KeyMaterial;
use jsonwebtoken::jwk::JwkSet;
use std::sync::Arc;

/// Where the key set is served.
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

/// Create an axum [`Router`](axum::Router) that serves the public signing key
/// at [`JWKS_PATH`].
///
/// The set is computed once; the private key never leaves [`KeyMaterial`].
pub fn jwks_router(key: &KeyMaterial) -> axum::Router {
    let jwks = Arc::new(JwkSet {
        keys: vec![key.public_jwk()],
    });
    axum::Router::new().route(
        JWKS_PATH,
        axum::routing::get(move || {
            let jwks = jwks.clone();
            async move { Json(jwks.as_ref().clone()).into_response() }
        }),
    )
}
