//! Shared fixtures for introspection tests.

#![allow(dead_code)]

use introspect::{
    AssertionConfig, IntrospectionClient, IntrospectionConfig, KeyMaterial, KeyStoreConfig,
    TokenAuthenticator,
};
use secrecy::SecretString;
use serde_json::Value;
use std::{collections::HashMap, sync::Arc, time::Duration};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, method, path},
};

pub const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");
pub const CLIENT_ID: &str = "resource-api";
pub const AUDIENCE: &str = "https://auth.example.com/realms/demo";
pub const INTROSPECT_PATH: &str = "/realms/demo/protocol/openid-connect/token/introspect";

pub fn key_material(kid: Option<&str>) -> Arc<KeyMaterial> {
    let mut config = KeyStoreConfig::new(
        format!("{FIXTURES}/keystore.pem"),
        SecretString::new("store-secret".into()),
        "client-signing",
    )
    .key_password(SecretString::new("key-secret".into()));
    if let Some(kid) = kid {
        config = config.kid(kid);
    }
    Arc::new(KeyMaterial::load(config).expect("fixture key loads"))
}

pub fn public_key_pem() -> Vec<u8> {
    std::fs::read(format!("{FIXTURES}/signing-public.pem")).expect("fixture public key")
}

pub fn authenticator_for(endpoint: &str, timeout: Duration) -> TokenAuthenticator {
    let client = IntrospectionClient::new(
        IntrospectionConfig::new(endpoint.parse().expect("valid url")).timeout(timeout),
    )
    .expect("http client");
    TokenAuthenticator::new(
        key_material(None),
        AssertionConfig::new(CLIENT_ID, AUDIENCE),
        client,
    )
}

/// Mock authorization server exposing an introspection endpoint.
pub struct MockAuthServer {
    pub server: MockServer,
}

impl MockAuthServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{INTROSPECT_PATH}", self.server.uri())
    }

    pub fn authenticator(&self, timeout: Duration) -> TokenAuthenticator {
        authenticator_for(&self.endpoint(), timeout)
    }

    /// Answer introspection of `token` with `body`.
    pub async fn respond_for(&self, token: &str, body: Value) {
        self.respond_for_with(token, ResponseTemplate::new(200).set_body_json(body))
            .await;
    }

    pub async fn respond_for_with(&self, token: &str, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(INTROSPECT_PATH))
            .and(body_string_contains(format!("token={token}&")))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Form fields of every request received so far.
    pub async fn received_forms(&self) -> Vec<HashMap<String, String>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| {
                url::form_urlencoded::parse(&request.body)
                    .into_owned()
                    .collect()
            })
            .collect()
    }
}
