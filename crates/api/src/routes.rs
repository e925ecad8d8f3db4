//! HTTP routes of the resource API.

use axum::{Extension, Json, Router, routing::get};
use chrono::{DateTime, Utc};
use introspect::{AuthenticatedIdentity, TokenAuthenticator};
use introspect_axum::auth::{AuthLayer, BearerAuth, oauth::jwks_router};
use serde::Serialize;

/// Name reported by the health endpoint.
pub const SERVICE: &str = "introspect-api";

#[derive(Serialize)]
pub struct Ping {
    pub ok: bool,
    pub service: &'static str,
    pub at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct Me {
    pub principal: AuthenticatedIdentity,
    pub at: DateTime<Utc>,
}

/// Public health check, `/api/**` behind bearer authentication, and the
/// signing key's JWKS.
pub fn router(authenticator: TokenAuthenticator, realm: Option<String>) -> Router {
    let jwks = jwks_router(authenticator.key_material());

    let mut auth = AuthLayer::new(BearerAuth::new(authenticator));
    if let Some(realm) = realm {
        auth = auth.with_realm(realm);
    }
    let api = Router::new().route("/api/me", get(me)).layer(auth);

    Router::new()
        .route("/public/ping", get(ping))
        .merge(api)
        .merge(jwks)
}

async fn ping() -> Json<Ping> {
    Json(Ping {
        ok: true,
        service: SERVICE,
        at: Utc::now(),
    })
}

async fn me(Extension(principal): Extension<AuthenticatedIdentity>) -> Json<Me> {
    Json(Me {
        principal,
        at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::{Request, StatusCode, header};
    use introspect::{
        AssertionConfig, IntrospectionClient, IntrospectionConfig, KeyMaterial, KeyStoreConfig,
    };
    use secrecy::SecretString;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    const KEYSTORE: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../introspect/tests/fixtures/keystore.pem"
    );

    fn app() -> Router {
        let key = KeyMaterial::load(KeyStoreConfig::new(
            KEYSTORE,
            SecretString::new("store-secret".into()),
            "shared",
        ))
        .unwrap();
        // Never reached: these tests do not get past the bearer check.
        let client = IntrospectionClient::new(IntrospectionConfig::new(
            "http://127.0.0.1:9/introspect".parse().unwrap(),
        ))
        .unwrap();
        let authenticator = TokenAuthenticator::new(
            Arc::new(key),
            AssertionConfig::new("resource-api", "https://auth.example.com"),
            client,
        );
        router(authenticator, Some("resource-api".into()))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn ping_is_public() {
        let (status, body) = get_json("/public/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["service"], SERVICE);
        assert!(body["at"].is_string());
    }

    #[tokio::test]
    async fn jwks_is_public() {
        let (status, body) = get_json("/.well-known/jwks.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["keys"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn me_requires_a_bearer_token() {
        let response = app()
            .oneshot(Request::get("/api/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            "Bearer realm=\"resource-api\""
        );
    }
}
