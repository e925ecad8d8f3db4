//! Normalization of introspection claims into an [`AuthenticatedIdentity`].
//!
//! Authorization servers report `exp`, `iat` and `nbf` as epoch seconds.
//! They are rewritten to UTC instants; everything else passes through as
//! received.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Claims carrying epoch-second timestamps.
pub const TEMPORAL_CLAIMS: [&str; 3] = ["exp", "iat", "nbf"];

/// Prefix of authorities derived from granted scopes.
pub const SCOPE_AUTHORITY_PREFIX: &str = "SCOPE_";

/// A single claim value of an authenticated identity.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClaimValue {
    /// A normalized timestamp.
    Instant(DateTime<Utc>),
    /// Any value as returned by the authorization server.
    Json(Value),
}

impl ClaimValue {
    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            ClaimValue::Instant(instant) => Some(*instant),
            ClaimValue::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ClaimValue::Json(value) => Some(value),
            ClaimValue::Instant(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(Value::as_str)
    }
}

/// Claim name to value.
pub type Claims = BTreeMap<String, ClaimValue>;

/// Convert a raw introspection response into normalized claims.
pub fn normalize(raw: Map<String, Value>) -> Claims {
    let mut claims = raw
        .into_iter()
        .map(|(name, value)| (name, ClaimValue::Json(value)))
        .collect();
    normalize_in_place(&mut claims);
    claims
}

/// Rewrite numeric temporal claims as instants.
///
/// Values that are already instants, non-numeric, or outside the
/// representable range are left untouched, so applying this twice is a
/// no-op.
pub fn normalize_in_place(claims: &mut Claims) {
    for name in TEMPORAL_CLAIMS {
        if let Some(value) = claims.get_mut(name) {
            if let Some(instant) = epoch_seconds(value) {
                *value = ClaimValue::Instant(instant);
            }
        }
    }
}

fn epoch_seconds(value: &ClaimValue) -> Option<DateTime<Utc>> {
    let ClaimValue::Json(Value::Number(n)) = value else {
        return None;
    };
    let secs = n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })?;
    DateTime::from_timestamp(secs, 0)
}

/// The caller behind a validated bearer token.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuthenticatedIdentity {
    name: Option<String>,
    attributes: Claims,
    authorities: BTreeSet<String>,
}

impl AuthenticatedIdentity {
    /// Build an identity from normalized claims.
    ///
    /// Authorities are derived from the `scope` claim, either a
    /// space-separated string or an array of strings.
    pub fn new(attributes: Claims) -> Self {
        let name = attributes
            .get("sub")
            .and_then(ClaimValue::as_str)
            .map(String::from);
        let authorities = match attributes.get("scope").and_then(ClaimValue::as_json) {
            Some(Value::String(scope)) => scope
                .split_whitespace()
                .map(|s| format!("{SCOPE_AUTHORITY_PREFIX}{s}"))
                .collect(),
            Some(Value::Array(scopes)) => scopes
                .iter()
                .filter_map(Value::as_str)
                .map(|s| format!("{SCOPE_AUTHORITY_PREFIX}{s}"))
                .collect(),
            _ => BTreeSet::new(),
        };
        Self {
            name,
            attributes,
            authorities,
        }
    }

    /// Normalize an introspection response and build the identity from it.
    pub fn from_introspection(raw: Map<String, Value>) -> Self {
        Self::new(normalize(raw))
    }

    /// The `sub` claim.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn attribute(&self, name: &str) -> Option<&ClaimValue> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &Claims {
        &self.attributes
    }

    pub fn authorities(&self) -> &BTreeSet<String> {
        &self.authorities
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.attribute("exp").and_then(ClaimValue::as_instant)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.attribute("iat").and_then(ClaimValue::as_instant)
    }

    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.attribute("nbf").and_then(ClaimValue::as_instant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn exp_becomes_exact_instant() {
        let claims = normalize(raw(json!({"active": true, "exp": 1_700_000_000})));
        let exp = claims["exp"].as_instant().unwrap();
        assert_eq!(exp.timestamp(), 1_700_000_000);
        assert_eq!(exp.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn all_temporal_claims_are_rewritten() {
        let claims = normalize(raw(json!({
            "exp": 1_700_000_600,
            "iat": 1_700_000_000,
            "nbf": 1_700_000_000,
            "auth_time": 1_699_999_000,
        })));
        for name in TEMPORAL_CLAIMS {
            assert!(claims[name].as_instant().is_some(), "{name}");
        }
        assert_eq!(claims["auth_time"], ClaimValue::Json(json!(1_699_999_000)));
    }

    #[test]
    fn non_numeric_values_pass_through() {
        let claims = normalize(raw(json!({"exp": "tomorrow", "iat": null, "sub": "alice"})));
        assert_eq!(claims["exp"], ClaimValue::Json(json!("tomorrow")));
        assert_eq!(claims["iat"], ClaimValue::Json(Value::Null));
        assert!(!claims.contains_key("nbf"));
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let mut claims = normalize(raw(json!({"exp": 1_700_000_000, "scope": "read"})));
        let once = claims.clone();
        normalize_in_place(&mut claims);
        assert_eq!(claims, once);
    }

    #[test]
    fn fractional_seconds_are_truncated() {
        let claims = normalize(raw(json!({"iat": 1_700_000_000.9})));
        assert_eq!(claims["iat"].as_instant().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn out_of_range_values_are_kept() {
        let claims = normalize(raw(json!({"exp": u64::MAX})));
        assert_eq!(claims["exp"], ClaimValue::Json(json!(u64::MAX)));
    }

    #[test]
    fn scope_string_becomes_authorities() {
        let identity = AuthenticatedIdentity::from_introspection(raw(json!({
            "sub": "alice",
            "scope": "profile  email",
        })));
        assert_eq!(identity.name(), Some("alice"));
        let authorities: Vec<_> = identity.authorities().iter().map(String::as_str).collect();
        assert_eq!(authorities, ["SCOPE_email", "SCOPE_profile"]);
    }

    #[test]
    fn scope_array_becomes_authorities() {
        let identity =
            AuthenticatedIdentity::from_introspection(raw(json!({"scope": ["a", 3, "b"]})));
        assert_eq!(identity.authorities().len(), 2);
        assert!(identity.authorities().contains("SCOPE_a"));
    }

    #[test]
    fn no_scope_means_no_authorities() {
        let identity = AuthenticatedIdentity::from_introspection(raw(json!({"sub": 42})));
        assert!(identity.authorities().is_empty());
        assert_eq!(identity.name(), None);
    }

    #[test]
    fn serializes_instants_as_rfc3339() {
        let identity = AuthenticatedIdentity::from_introspection(raw(json!({
            "sub": "alice",
            "exp": 1_700_000_000,
        })));
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["name"], "alice");
        let exp = json["attributes"]["exp"].as_str().unwrap();
        assert!(exp.starts_with("2023-11-14T22:13:20"), "{exp}");
        assert_eq!(json["authorities"], json!([]));
    }
}
