//! # introspect
//!
//! Validation of opaque bearer tokens for resource servers.
//!
//! Tokens are checked against an authorization server's RFC 7662
//! introspection endpoint. The resource server authenticates itself to that
//! endpoint with a private-key JWT client assertion (RFC 7523) signed by a
//! key loaded once at startup.
//!
//! ```rust,no_run
//! use introspect::{
//!     AssertionConfig, IntrospectionClient, IntrospectionConfig, KeyMaterial, KeyStoreConfig,
//!     TokenAuthenticator,
//! };
//! use secrecy::SecretString;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let key = KeyMaterial::load(
//!     KeyStoreConfig::new("keystore.pem", SecretString::new("changeit".into()), "client-signing")
//!         .kid("k1"),
//! )?;
//! let client = IntrospectionClient::new(IntrospectionConfig::new(
//!     "https://auth.example.com/realms/demo/protocol/openid-connect/token/introspect".parse()?,
//! ))?;
//! let authenticator = TokenAuthenticator::new(
//!     Arc::new(key),
//!     AssertionConfig::new("resource-api", "https://auth.example.com/realms/demo"),
//!     client,
//! );
//!
//! let identity = authenticator.authenticate("opaque-token").await?;
//! println!("{:?} expires at {:?}", identity.name(), identity.expires_at());
//! # Ok(())
//! # }
//! ```

pub mod assertion;
pub mod authenticator;
pub mod claims;
pub mod error;
pub mod introspection;
pub mod keystore;

pub use assertion::{AssertionClaims, AssertionConfig, ClientAssertion};
pub use authenticator::TokenAuthenticator;
pub use claims::{AuthenticatedIdentity, ClaimValue, Claims};
pub use error::{AuthError, ErrorKind};
pub use introspection::{
    IntrospectionClient, IntrospectionConfig, IntrospectionRequest, IntrospectionResponse,
};
pub use keystore::{KeyMaterial, KeyMaterialError, KeyStoreConfig, seal};
