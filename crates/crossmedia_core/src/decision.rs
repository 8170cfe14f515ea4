//! Authorization outcomes and the external actions they map to.

use serde::{Deserialize, Serialize};

/// A signed access token: `timestamp SEP signature`.
///
/// The raw value is available through `Display` and [`SignedToken::as_str`] for
/// embedding into URLs. `Debug` output is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub struct SignedToken(String);

impl SignedToken {
    /// Wrap an encoded token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the encoded token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the encoded token.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for SignedToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SignedToken(<redacted>)")
    }
}

/// Outcome of evaluating one request.
///
/// Produced exactly once per request by the authorization engine and consumed
/// exactly once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The resource is public
    ServePublic,
    /// Access was granted, by a verified token (`Some`) or by explicit permission (`None`)
    ServeAuthorized(Option<SignedToken>),
    /// Send the caller to this media domain URL
    RedirectToMedia(String),
    /// Send the caller to this web domain URL to authenticate
    RedirectToAuth(String),
    /// Hard denial
    Deny,
    /// The token had a valid signature but was too old
    TokenExpired,
    /// No token was presented
    TokenMissing,
    /// The token was malformed or tampered with
    TokenInvalid,
}

impl Decision {
    /// Short name of the variant, safe to log (never contains a token or URL).
    pub fn label(&self) -> &'static str {
        match self {
            Decision::ServePublic => "serve_public",
            Decision::ServeAuthorized(_) => "serve_authorized",
            Decision::RedirectToMedia(_) => "redirect_to_media",
            Decision::RedirectToAuth(_) => "redirect_to_auth",
            Decision::Deny => "deny",
            Decision::TokenExpired => "token_expired",
            Decision::TokenMissing => "token_missing",
            Decision::TokenInvalid => "token_invalid",
        }
    }

    /// Whether this decision lets the caller see the media bytes.
    pub fn is_serve(&self) -> bool {
        matches!(self, Decision::ServePublic | Decision::ServeAuthorized(_))
    }

    /// Whether this decision sends the caller back to re-authenticate.
    pub fn needs_reauthentication(&self) -> bool {
        matches!(
            self,
            Decision::TokenMissing | Decision::TokenExpired | Decision::RedirectToAuth(_)
        )
    }
}

/// What the surrounding web layer must emit for a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Ask the reverse proxy to deliver a local file
    InternalServe {
        /// Trusted response header carrying the instruction (e.g. `X-Accel-Redirect`)
        header: String,
        /// Internal path the proxy resolves to a file
        path: String,
    },
    /// HTTP redirect
    Redirect {
        /// Target URL
        location: String,
    },
    /// Hard denial, no body and no redirect
    Deny,
    /// Stream the file from disk directly (local/debug mode only)
    ServeFile {
        /// Path of the file relative to the media root
        storage_path: String,
    },
}
