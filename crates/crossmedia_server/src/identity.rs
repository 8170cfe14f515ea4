//! Caller identity derived from request headers.

use axum::http::HeaderMap;
use axum::http::header::HeaderName;

/// Derives the caller of a web domain request.
///
/// The service never asks for an identity on the media domain.
pub trait IdentityProvider: Send + Sync {
    /// Borrowed caller type, matching the policy's `Caller`.
    type Caller: ?Sized + ToOwned;

    /// Identify the caller from request headers, or `None` for an anonymous request.
    fn identify(&self, headers: &HeaderMap) -> Option<<Self::Caller as ToOwned>::Owned>;
}

/// Trusts a header set by an upstream authenticating proxy.
///
/// # Examples
///
/// ```
/// use axum::http::HeaderMap;
/// use crossmedia_server::{HeaderIdentity, IdentityProvider};
///
/// let identity = HeaderIdentity::default();
/// let mut headers = HeaderMap::new();
/// assert_eq!(identity.identify(&headers), None);
///
/// headers.insert("x-remote-user", "alice".parse().unwrap());
/// assert_eq!(identity.identify(&headers).as_deref(), Some("alice"));
/// ```
#[derive(Debug, Clone)]
pub struct HeaderIdentity {
    header: HeaderName,
}

impl HeaderIdentity {
    /// Header used when none is configured.
    pub const DEFAULT_HEADER: &'static str = "x-remote-user";

    /// Read the caller from `header`.
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }

    /// The header the caller is read from.
    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl Default for HeaderIdentity {
    fn default() -> Self {
        Self::new(HeaderName::from_static(Self::DEFAULT_HEADER))
    }
}

impl IdentityProvider for HeaderIdentity {
    type Caller = str;

    fn identify(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}
