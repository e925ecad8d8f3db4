//! Authentication middleware for axum services.
//!
//! Provides a tower middleware that validates incoming requests using a
//! user-defined [`Authenticator`]. On success, the authenticated claims are
//! inserted into HTTP extensions and become accessible in handlers via
//! `Extension(claims): Extension<Claims>`.
//!
//! Failures are answered with `401 Unauthorized` (or `400` for a garbled
//! `Authorization` header) and a `WWW-Authenticate` challenge built from the
//! layer's [`ChallengeConfig`](oauth::ChallengeConfig).
//!
//! # Example
//!
//! ```rust,ignore
//! use introspect_axum::auth::{AuthLayer, BearerAuth, Validator};
//!
//! #[derive(Clone)]
//! struct MyValidator;
//!
//! impl Validator for MyValidator {
//!     type Claims = String;
//!     type Error = String;
//!
//!     async fn validate(&self, token: &str) -> Result<String, String> {
//!         Ok("user1".into())
//!     }
//! }
//!
//! let app = axum::Router::new()
//!     .route("/api/me", axum::routing::get(me))
//!     .layer(AuthLayer::new(BearerAuth::new(MyValidator)).with_realm("resource-api"));
//! ```

mod bearer;

pub mod oauth;

#[cfg(feature = "introspection")]
mod introspection;

pub use bearer::{BearerAuth, BearerError, bearer_token};

use futures::future::BoxFuture;
use http::{Request, Response, StatusCode};
use oauth::{ChallengeConfig, www_authenticate};
use std::task::{Context, Poll};

/// Trait for validating incoming requests.
///
/// On success, `Claims` is inserted into `http::Extensions`.
pub trait Authenticator: Clone + Send + Sync + 'static {
    /// The claims type produced on successful authentication.
    type Claims: Clone + Send + Sync + 'static;

    /// The error type returned on authentication failure.
    type Error: Rejection;

    /// Validate the request and return claims, or an error.
    fn authenticate(
        &self,
        parts: &http::request::Parts,
    ) -> impl Future<Output = Result<Self::Claims, Self::Error>> + Send;
}

/// Trait for validating a credential string (e.g., a Bearer token).
///
/// Wrap an implementation in [`BearerAuth`], which handles credential
/// extraction from the `Authorization` header.
pub trait Validator: Clone + Send + Sync + 'static {
    /// The claims type produced on successful validation.
    type Claims: Clone + Send + Sync + 'static;

    /// The error type returned on validation failure.
    ///
    /// Only logged; never sent to the client.
    type Error: std::fmt::Display + Send;

    /// Validate the credential string and return claims, or an error.
    fn validate(
        &self,
        credential: &str,
    ) -> impl Future<Output = Result<Self::Claims, Self::Error>> + Send;
}

/// How an authentication failure is presented to the client.
///
/// `Display` becomes the response body.
pub trait Rejection: std::fmt::Display + Send {
    /// Response status.
    fn status(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    /// RFC 6750 error code for the challenge, `None` when the request
    /// carried no credentials at all.
    fn error_code(&self) -> Option<&'static str> {
        Some("invalid_token")
    }
}

/// Tower [`Layer`](tower::Layer) that applies [`AuthService`].
#[derive(Clone)]
pub struct AuthLayer<A> {
    authenticator: A,
    challenge: ChallengeConfig,
}

impl<A> AuthLayer<A> {
    pub fn new(authenticator: A) -> Self {
        Self {
            authenticator,
            challenge: ChallengeConfig::default(),
        }
    }

    /// Set the `realm` advertised in `WWW-Authenticate` challenges.
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.challenge.realm = Some(realm.into());
        self
    }

    /// Replace the whole challenge configuration.
    pub fn with_challenge(mut self, challenge: ChallengeConfig) -> Self {
        self.challenge = challenge;
        self
    }
}

impl<A, S> tower::Layer<S> for AuthLayer<A>
where
    A: Clone,
{
    type Service = AuthService<A, S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            authenticator: self.authenticator.clone(),
            challenge: self.challenge.clone(),
            inner,
        }
    }
}

/// Tower service that authenticates requests before forwarding them.
#[derive(Clone)]
pub struct AuthService<A, S> {
    authenticator: A,
    challenge: ChallengeConfig,
    inner: S,
}

impl<A, S, B> tower::Service<Request<B>> for AuthService<A, S>
where
    A: Authenticator,
    S: tower::Service<Request<B>, Response = Response<axum::body::Body>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Send,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let authenticator = self.authenticator.clone();
        let challenge = self.challenge.clone();
        let mut inner = self.inner.clone();
        // swap to ensure poll_ready state is preserved
        std::mem::swap(&mut self.inner, &mut inner);

        Box::pin(async move {
            let (parts, body) = req.into_parts();

            match authenticator.authenticate(&parts).await {
                Ok(claims) => {
                    let mut req = Request::from_parts(parts, body);
                    req.extensions_mut().insert(claims);
                    inner.call(req).await
                }
                Err(err) => {
                    let status = err.status();
                    tracing::debug!(%status, path = %parts.uri.path(), "request rejected");
                    Ok(rejection_response(&challenge, &err))
                }
            }
        })
    }
}

fn rejection_response<E: Rejection>(
    challenge: &ChallengeConfig,
    err: &E,
) -> Response<axum::body::Body> {
    let mut response = Response::new(axum::body::Body::from(err.to_string()));
    *response.status_mut() = err.status();
    response.headers_mut().insert(
        http::header::WWW_AUTHENTICATE,
        www_authenticate(challenge, err.error_code()),
    );
    response
}
