//! `WWW-Authenticate` challenges for bearer-protected resources.

use http::HeaderValue;

/// Parameters advertised in every challenge.
#[derive(Clone, Debug, Default)]
pub struct ChallengeConfig {
    /// Protection space shown to clients as `realm="..."`.
    pub realm: Option<String>,
    /// Scopes needed for the resource, as `scope="..."`.
    pub scope: Option<String>,
}

/// Build a `WWW-Authenticate` header value.
///
/// Format: `Bearer [realm="<realm>"][, scope="<scope>"][, error="<code>"]`.
/// Without an error code the challenge tells the client credentials are
/// required (RFC 6750 §3.1).
pub fn www_authenticate(config: &ChallengeConfig, error: Option<&str>) -> HeaderValue {
    let params: Vec<String> = [
        ("realm", config.realm.as_deref()),
        ("scope", config.scope.as_deref()),
        ("error", error),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|v| format!("{name}=\"{}\"", quote(v))))
    .collect();

    let value = if params.is_empty() {
        "Bearer".to_owned()
    } else {
        format!("Bearer {}", params.join(", "))
    };
    HeaderValue::from_str(&value).unwrap_or_else(|_| {
        tracing::warn!("challenge parameters are not valid header text; sending bare challenge");
        HeaderValue::from_static("Bearer")
    })
}

fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
