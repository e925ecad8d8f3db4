//! Resource API protected by opaque bearer tokens.
//!
//! Every request to `/api/**` is validated against the authorization
//! server's introspection endpoint before it reaches a handler.

pub mod app;
pub mod error;
pub mod routes;

pub use app::App;
