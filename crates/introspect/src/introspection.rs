//! OAuth 2.0 Token Introspection (RFC 7662) with private-key JWT client
//! authentication (RFC 7523).
//!
//! ```rust,no_run
//! use introspect::{
//!     ClientAssertion, IntrospectionClient, IntrospectionConfig, IntrospectionRequest,
//! };
//! # async fn example(
//! #     assertion_config: introspect::AssertionConfig,
//! #     key: introspect::KeyMaterial,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let client = IntrospectionClient::new(IntrospectionConfig::new(
//!     "https://auth.example.com/realms/demo/protocol/openid-connect/token/introspect".parse()?,
//! ))?;
//!
//! let assertion = ClientAssertion::build(&assertion_config, &key)?;
//! let request =
//!     IntrospectionRequest::new("opaque-token", &assertion_config.client_id, &assertion);
//! let response = client.introspect(&request).await?;
//! println!("active: {}", response.is_active());
//! # Ok(())
//! # }
//! ```

use crate::{
    assertion::{CLIENT_ASSERTION_TYPE, ClientAssertion},
    error::AuthError,
};
use reqwest::Url;
use serde::Serialize;
use serde_json::{Map, Value};
use std::{fmt, time::Duration};

/// Default bound on a whole introspection exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on establishing the connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Where and how to reach the introspection endpoint.
#[derive(Clone, Debug)]
pub struct IntrospectionConfig {
    pub endpoint: Url,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl IntrospectionConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Form body of an introspection call (RFC 7662 §2.1, RFC 7523 §2.2).
#[derive(Clone, Serialize)]
pub struct IntrospectionRequest<'a> {
    token: &'a str,
    client_id: &'a str,
    client_assertion_type: &'static str,
    client_assertion: &'a str,
}

impl<'a> IntrospectionRequest<'a> {
    pub fn new(token: &'a str, client_id: &'a str, assertion: &'a ClientAssertion) -> Self {
        Self {
            token,
            client_id,
            client_assertion_type: CLIENT_ASSERTION_TYPE,
            client_assertion: assertion.as_str(),
        }
    }
}

impl fmt::Debug for IntrospectionRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntrospectionRequest")
            .field("token", &"[REDACTED]")
            .field("client_id", &self.client_id)
            .field("client_assertion_type", &self.client_assertion_type)
            .field("client_assertion", &"[REDACTED]")
            .finish()
    }
}

/// Claims reported by the authorization server (RFC 7662 §2.2).
#[derive(Clone, Debug, PartialEq)]
pub struct IntrospectionResponse {
    claims: Map<String, Value>,
}

/// State of the `active` member of a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveState {
    Active,
    Inactive,
    Missing,
    NotBoolean,
}

impl IntrospectionResponse {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    /// Parse a response body, which must be a JSON object.
    pub fn from_slice(body: &[u8]) -> Result<Self, AuthError> {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(claims)) => Ok(Self { claims }),
            Ok(_) => Err(AuthError::MalformedResponse(
                "body is not a JSON object".into(),
            )),
            Err(e) => Err(AuthError::MalformedResponse(e.to_string())),
        }
    }

    pub fn active_state(&self) -> ActiveState {
        match self.claims.get("active") {
            Some(Value::Bool(true)) => ActiveState::Active,
            Some(Value::Bool(false)) => ActiveState::Inactive,
            Some(_) => ActiveState::NotBoolean,
            None => ActiveState::Missing,
        }
    }

    /// `true` only for an explicit boolean `active: true`.
    pub fn is_active(&self) -> bool {
        self.active_state() == ActiveState::Active
    }

    /// Accept an active token, reject everything else.
    pub fn require_active(self) -> Result<Map<String, Value>, AuthError> {
        match self.active_state() {
            ActiveState::Active => Ok(self.claims),
            ActiveState::Inactive => Err(AuthError::TokenInactive),
            ActiveState::Missing => Err(AuthError::MalformedResponse(
                "missing `active` member".into(),
            )),
            ActiveState::NotBoolean => Err(AuthError::MalformedResponse(
                "`active` is not a boolean".into(),
            )),
        }
    }

    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }
}

/// Client for one introspection endpoint.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct IntrospectionClient {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl fmt::Debug for IntrospectionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntrospectionClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("http_client", &"<reqwest::Client>")
            .finish()
    }
}

impl IntrospectionClient {
    /// Build a client with its own bounded HTTP connection pool.
    pub fn new(config: IntrospectionConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self::with_http_client(config.endpoint, http_client))
    }

    /// Use an existing HTTP client. Its timeouts apply.
    pub fn with_http_client(endpoint: Url, http_client: reqwest::Client) -> Self {
        Self {
            endpoint,
            http_client,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one introspection request.
    ///
    /// Transport failures and non-success statuses are errors; the `active`
    /// member is not interpreted here.
    pub async fn introspect(
        &self,
        request: &IntrospectionRequest<'_>,
    ) -> Result<IntrospectionResponse, AuthError> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status(status));
        }

        let body = response.bytes().await?;
        IntrospectionResponse::from_slice(&body)
    }
}
