//! Per-request authorization context.

use crossmedia_core::{Domain, MediaReference};

/// Everything the engine knows about one request.
///
/// Created per request and discarded once a decision has been made.
pub struct AuthorizationContext<'a, C: ?Sized> {
    reference: MediaReference,
    caller: Option<&'a C>,
    domain: Domain,
    token: Option<String>,
}

impl<'a, C: ?Sized> AuthorizationContext<'a, C> {
    /// Create a context without caller or token.
    pub fn new(reference: MediaReference, domain: Domain) -> Self {
        Self {
            reference,
            caller: None,
            domain,
            token: None,
        }
    }

    /// Attach the caller identity.
    pub fn with_caller(mut self, caller: Option<&'a C>) -> Self {
        self.caller = caller;
        self
    }

    /// Attach the token extracted from the request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// The media object being requested.
    pub fn reference(&self) -> &MediaReference {
        &self.reference
    }

    /// The caller, if the request carries an identity.
    pub fn caller(&self) -> Option<&'a C> {
        self.caller
    }

    /// The domain the request arrived on.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// The token presented with the request.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl<C: ?Sized> std::fmt::Debug for AuthorizationContext<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationContext")
            .field("reference", &self.reference)
            .field("has_caller", &self.caller.is_some())
            .field("domain", &self.domain)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}
