use reqwest::StatusCode;
use thiserror::Error;

/// Why a single authentication attempt failed.
///
/// Every variant means the request is unauthenticated; [`AuthError::kind`]
/// tells the failure classes apart for logging and retry decisions.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("failed to sign client assertion: {0}")]
    AssertionSigning(#[source] jsonwebtoken::errors::Error),

    #[error("introspection request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("introspection endpoint returned HTTP {0}")]
    Status(StatusCode),

    #[error("token is not active")]
    TokenInactive,

    #[error("malformed introspection response: {0}")]
    MalformedResponse(String),
}

/// Coarse classification of [`AuthError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The assertion could not be signed. Points at corrupted key state.
    AssertionSigning,
    /// The authorization server could not be reached or answered with an
    /// error status. The token was not evaluated.
    IntrospectionTransport,
    /// The authorization server reports the token inactive.
    TokenInactive,
    /// The response lacked a boolean `active` member or was not a JSON
    /// object.
    MalformedResponse,
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::AssertionSigning(_) => ErrorKind::AssertionSigning,
            AuthError::Transport(_) | AuthError::Status(_) => ErrorKind::IntrospectionTransport,
            AuthError::TokenInactive => ErrorKind::TokenInactive,
            AuthError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }

    /// Whether the outbound call hit its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AuthError::Transport(e) if e.is_timeout())
    }
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::AssertionSigning => "assertion_signing",
            ErrorKind::IntrospectionTransport => "introspection_transport",
            ErrorKind::TokenInactive => "token_inactive",
            ErrorKind::MalformedResponse => "malformed_response",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
