//! Command-line configuration and server lifecycle.

use crate::{error::Error, routes};
use clap::Parser;
use introspect::{
    AssertionConfig, IntrospectionClient, IntrospectionConfig, KeyMaterial, KeyStoreConfig,
    TokenAuthenticator,
};
use jsonwebtoken::Algorithm;
use secrecy::SecretString;
use std::{convert::Infallible, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use url::Url;

/// Resource API validating opaque bearer tokens by introspection.
#[derive(Parser)]
#[command(name = "introspect-api", version, about)]
pub struct App {
    /// Address to listen on.
    #[arg(long, env = "INTROSPECT_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Introspection endpoint of the authorization server.
    #[arg(long, env = "INTROSPECT_URI")]
    pub introspection_uri: Url,

    /// Client id registered for this API; issuer and subject of assertions.
    #[arg(long, env = "INTROSPECT_CLIENT_ID")]
    pub client_id: String,

    /// Audience of client assertions, usually the issuer URL of the realm.
    #[arg(long, env = "INTROSPECT_AUDIENCE")]
    pub audience: String,

    /// PEM key store holding the signing key.
    #[arg(long, env = "INTROSPECT_KEYSTORE", value_name = "PATH")]
    pub keystore: PathBuf,

    /// Password of the key store.
    #[arg(
        long,
        env = "INTROSPECT_KEYSTORE_PASSWORD",
        hide_env_values = true,
        value_parser = parse_secret
    )]
    pub keystore_password: SecretString,

    /// Alias of the signing key within the store.
    #[arg(long, env = "INTROSPECT_KEY_ALIAS")]
    pub key_alias: String,

    /// Password of the signing key; defaults to the store password.
    #[arg(
        long,
        env = "INTROSPECT_KEY_PASSWORD",
        hide_env_values = true,
        value_parser = parse_secret
    )]
    pub key_password: Option<SecretString>,

    /// Key id placed in the assertion header.
    #[arg(long, env = "INTROSPECT_KID")]
    pub kid: Option<String>,

    /// Assertion signing algorithm (RS256, RS384, RS512, PS256, PS384, PS512).
    #[arg(long, env = "INTROSPECT_SIGNING_ALGORITHM", default_value = "RS256")]
    pub signing_algorithm: Algorithm,

    /// Bound on a whole introspection call, in milliseconds.
    #[arg(long, env = "INTROSPECT_TIMEOUT_MS", default_value_t = 5000)]
    pub introspection_timeout_ms: u64,

    /// Bound on connecting to the introspection endpoint, in milliseconds.
    #[arg(long, env = "INTROSPECT_CONNECT_TIMEOUT_MS", default_value_t = 2000)]
    pub connect_timeout_ms: u64,

    /// Realm advertised in `WWW-Authenticate` challenges.
    #[arg(long, env = "INTROSPECT_REALM")]
    pub realm: Option<String>,
}

impl App {
    /// Parse CLI arguments and serve until Ctrl-C.
    pub async fn run() -> Result<(), Error> {
        let app = App::parse();
        let bind = app.bind;
        let realm = app.realm.clone();
        let authenticator = app.authenticator()?;

        let router = routes::router(authenticator, realm);
        let listener = tokio::net::TcpListener::bind(bind).await?;
        tracing::info!(addr = %listener.local_addr()?, "listening");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("stopped");
        Ok(())
    }

    /// Load the signing key and wire up the token authenticator.
    pub fn authenticator(self) -> Result<TokenAuthenticator, Error> {
        let mut keystore = KeyStoreConfig::new(
            self.keystore,
            self.keystore_password,
            self.key_alias,
        )
        .algorithm(self.signing_algorithm);
        if let Some(password) = self.key_password {
            keystore = keystore.key_password(password);
        }
        if let Some(kid) = self.kid {
            keystore = keystore.kid(kid);
        }
        let key = KeyMaterial::load(keystore)?;

        let client = IntrospectionClient::new(
            IntrospectionConfig::new(self.introspection_uri)
                .timeout(Duration::from_millis(self.introspection_timeout_ms))
                .connect_timeout(Duration::from_millis(self.connect_timeout_ms)),
        )?;

        Ok(TokenAuthenticator::new(
            Arc::new(key),
            AssertionConfig::new(self.client_id, self.audience),
            client,
        ))
    }
}

fn parse_secret(value: &str) -> Result<SecretString, Infallible> {
    Ok(SecretString::new(value.to_owned()))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(e) => {
            tracing::error!(error = %e, "cannot listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
