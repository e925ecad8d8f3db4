//! # introspect-axum
//!
//! Bearer-token authentication for [axum](https://docs.rs/axum) services.
//!
//! ## Auth Middleware
//!
//! Provides a pluggable [`Authenticator`](auth::Authenticator) trait and tower
//! middleware that validates requests before they reach the protected routes.
//! With the `introspection` feature (on by default),
//! [`TokenAuthenticator`](introspect::TokenAuthenticator) plugs straight in as
//! a [`Validator`](auth::Validator).
//!
//! ```rust,ignore
//! use introspect_axum::auth::{AuthLayer, BearerAuth};
//!
//! let app = axum::Router::new()
//!     .route("/api/me", axum::routing::get(me))
//!     .layer(AuthLayer::new(BearerAuth::new(authenticator)).with_realm("resource-api"));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
