//! Shared request handling state.

use crate::IdentityProvider;
use axum::http::HeaderMap;
use crossmedia_auth::{AuthorizationEngine, MediaPolicy, PolicyResolver, RequestDispatcher};
use crossmedia_core::{Action, DomainClassifier, MediaAuthConfig};
use crossmedia_error::{ConfigError, PolicyError};
use crossmedia_signing::{Clock, SystemClock};
use std::borrow::Borrow;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Everything needed to answer media requests, shared across handlers.
#[derive(Debug)]
pub struct MediaService<R, I, C = SystemClock> {
    engine: AuthorizationEngine<C>,
    dispatcher: RequestDispatcher,
    classifier: DomainClassifier,
    resolver: R,
    identity: I,
    media_root: PathBuf,
}

impl<R, I> MediaService<R, I> {
    /// Build a service with a system-clock engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn from_config(
        config: &MediaAuthConfig,
        resolver: R,
        identity: I,
    ) -> Result<Self, ConfigError> {
        let engine = AuthorizationEngine::from_config(config)?;
        Ok(Self::new(engine, config, resolver, identity))
    }
}

impl<R, I, C> MediaService<R, I, C> {
    /// Build a service around an existing engine.
    pub fn new(
        engine: AuthorizationEngine<C>,
        config: &MediaAuthConfig,
        resolver: R,
        identity: I,
    ) -> Self {
        Self {
            engine,
            dispatcher: RequestDispatcher::from_config(config),
            classifier: DomainClassifier::from_config(config),
            resolver,
            identity,
            media_root: config.media_root().clone(),
        }
    }

    /// The authorization engine.
    pub fn engine(&self) -> &AuthorizationEngine<C> {
        &self.engine
    }

    /// The policy resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The domain classifier.
    pub fn classifier(&self) -> &DomainClassifier {
        &self.classifier
    }

    /// Directory served directly in local/debug mode.
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }
}

impl<R, I, C> MediaService<R, I, C>
where
    R: PolicyResolver,
    I: IdentityProvider,
    R::Policy: MediaPolicy<Caller = I::Caller>,
    C: Clock,
{
    /// Decide what to do with a request for `key`.
    ///
    /// `request_url` is the request target including its query string.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error when `key` names no media object.
    #[instrument(skip(self, headers, request_url))]
    pub fn decide(
        &self,
        key: &str,
        host: Option<&str>,
        headers: &HeaderMap,
        request_url: &str,
    ) -> Result<Action, PolicyError> {
        let policy = self.resolver.resolve(key)?;
        let domain = self.classifier.classify(host);

        let owned = if domain.has_identity() {
            self.identity.identify(headers)
        } else {
            None
        };
        let caller: Option<&I::Caller> = owned.as_ref().map(Borrow::borrow);
        debug!(%domain, identified = caller.is_some(), "Classified request");

        let context = self.engine.context(&policy, domain, caller, request_url);
        let decision = self.engine.evaluate(&policy, &context);
        Ok(self.dispatcher.dispatch(domain, decision, &policy))
    }
}
