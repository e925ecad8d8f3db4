//! [`Validator`] backed by token introspection.
//!
//! ```rust,ignore
//! use introspect_axum::auth::{AuthLayer, BearerAuth};
//!
//! let app = axum::Router::new()
//!     .route("/api/me", axum::routing::get(me))
//!     .layer(AuthLayer::new(BearerAuth::new(authenticator)));
//!
//! async fn me(Extension(identity): Extension<AuthenticatedIdentity>) -> String {
//!     identity.name().unwrap_or_default().to_owned()
//! }
//! ```

use crate::auth::Validator;
use introspect::{AuthError, AuthenticatedIdentity, TokenAuthenticator};

impl Validator for TokenAuthenticator {
    type Claims = AuthenticatedIdentity;
    type Error = AuthError;

    async fn validate(&self, credential: &str) -> Result<AuthenticatedIdentity, AuthError> {
        self.authenticate(credential).await
    }
}
