//! Per-request validation of opaque bearer tokens.
//!
//! A single pass: sign a client assertion, introspect the token, require
//! `active: true`, normalize the claims. Any failure rejects the request;
//! nothing is retried here.

use crate::{
    assertion::{AssertionConfig, ClientAssertion},
    claims::AuthenticatedIdentity,
    error::{AuthError, ErrorKind},
    introspection::{IntrospectionClient, IntrospectionRequest},
    keystore::KeyMaterial,
};
use std::sync::Arc;
use tracing::Instrument;

/// Validates bearer tokens against the authorization server.
///
/// Holds only shared, read-only state; clones are cheap and flows for
/// different requests run concurrently without coordination.
#[derive(Clone, Debug)]
pub struct TokenAuthenticator {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    key: Arc<KeyMaterial>,
    assertion: AssertionConfig,
    client: IntrospectionClient,
}

impl TokenAuthenticator {
    pub fn new(
        key: Arc<KeyMaterial>,
        assertion: AssertionConfig,
        client: IntrospectionClient,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                key,
                assertion,
                client,
            }),
        }
    }

    pub fn key_material(&self) -> &Arc<KeyMaterial> {
        &self.inner.key
    }

    /// Validate `token` and return the identity it represents.
    ///
    /// Dropping the returned future aborts the outbound call.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError> {
        let span = tracing::debug_span!(
            "authenticate",
            endpoint = %self.inner.client.endpoint(),
            jti = tracing::field::Empty,
        );
        async {
            let result = self.run(token).await;
            if let Err(ref err) = result {
                report(err);
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError> {
        let Inner {
            key,
            assertion,
            client,
        } = self.inner.as_ref();

        let client_assertion = ClientAssertion::build(assertion, key)?;
        tracing::Span::current().record("jti", client_assertion.jti());
        tracing::trace!("client assertion built");

        let request = IntrospectionRequest::new(token, &assertion.client_id, &client_assertion);
        let response = client.introspect(&request).await?;
        tracing::trace!("token introspected");

        let claims = response.require_active()?;
        let identity = AuthenticatedIdentity::from_introspection(claims);
        tracing::debug!(sub = identity.name(), "token active");
        Ok(identity)
    }
}

fn report(err: &AuthError) {
    let kind = err.kind();
    match kind {
        ErrorKind::AssertionSigning => {
            tracing::error!(
                %kind,
                error = %err,
                "client assertion signing failed; key material may be corrupted"
            )
        }
        ErrorKind::IntrospectionTransport => {
            tracing::warn!(
                %kind,
                error = %err,
                timeout = err.is_timeout(),
                "introspection unavailable"
            )
        }
        ErrorKind::MalformedResponse => {
            tracing::warn!(
                %kind,
                error = %err,
                "rejecting token on malformed introspection response"
            )
        }
        ErrorKind::TokenInactive => tracing::debug!(%kind, "token rejected"),
    }
}
