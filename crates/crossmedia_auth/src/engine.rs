//! The cross-domain authorization state machine.

use crate::urls::join_base;
use crate::{AuthorizationContext, MediaPolicy};
use crossmedia_core::{Decision, Domain, MediaAuthConfig, SignedToken};
use crossmedia_error::{ConfigError, SignatureError, SignatureErrorKind, UrlError};
use crossmedia_signing::{Clock, PathSigner, SystemClock, TokenCodec, origin};
use tracing::{debug, error, info, instrument};

/// Decides, for one request, whether and how the caller gets to the media.
///
/// | Domain | Public | Outcome |
/// |---|---|---|
/// | media | yes | `ServePublic` |
/// | media | no | valid token → `ServeAuthorized`, absent → `TokenMissing` |
/// | media | no | stale token → `TokenExpired`, tampered → `TokenInvalid` |
/// | web | yes | `RedirectToMedia` without token |
/// | web | no | permitted → `RedirectToMedia` with token, otherwise `Deny` |
/// | local debug | yes | `ServePublic` |
/// | local debug | no | permitted or valid token → `ServeAuthorized`, otherwise `Deny` |
///
/// Stale and missing tokens fail open into re-authentication; tampered tokens fail
/// closed. No signature error ever leaves the engine.
#[derive(Debug, Clone)]
pub struct AuthorizationEngine<C = SystemClock> {
    signer: PathSigner<C>,
    codec: TokenCodec,
    max_age_secs: u64,
    site_url: String,
    media_origin: String,
}

impl AuthorizationEngine<SystemClock> {
    /// Build an engine with a system-clock signer from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn from_config(config: &MediaAuthConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(PathSigner::from_config(config)?, config))
    }
}

impl<C: Clock> AuthorizationEngine<C> {
    /// Build an engine around an existing signer; URLs, token parameter and max age
    /// come from `config`.
    pub fn new(signer: PathSigner<C>, config: &MediaAuthConfig) -> Self {
        Self {
            signer,
            codec: TokenCodec::from_config(config),
            max_age_secs: *config.token_max_age_secs(),
            site_url: config.site_url().clone(),
            media_origin: origin(config.media_url()),
        }
    }

    /// The signer used to mint and verify tokens.
    pub fn signer(&self) -> &PathSigner<C> {
        &self.signer
    }

    /// The codec used to carry tokens in URLs.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Build the context for a request to `request_url` on `domain`.
    ///
    /// The token is extracted from the request's query string. The caller is dropped
    /// on the media domain, which carries no identity.
    pub fn context<'a, P: MediaPolicy>(
        &self,
        policy: &P,
        domain: Domain,
        caller: Option<&'a P::Caller>,
        request_url: &str,
    ) -> AuthorizationContext<'a, P::Caller> {
        let caller = if domain.has_identity() { caller } else { None };
        AuthorizationContext::new(policy.reference(), domain)
            .with_caller(caller)
            .with_token(self.codec.extract(request_url))
    }

    /// Evaluate one request.
    #[instrument(
        skip(self, policy, context),
        fields(domain = %context.domain(), media = %context.reference().id())
    )]
    pub fn evaluate<P: MediaPolicy>(
        &self,
        policy: &P,
        context: &AuthorizationContext<'_, P::Caller>,
    ) -> Decision {
        let decision = match context.domain() {
            Domain::Media => self.evaluate_media(policy, context),
            Domain::Web => self.evaluate_web(policy, context),
            Domain::LocalDebug => self.evaluate_local(policy, context),
        };
        info!(decision = decision.label(), "Authorization decided");
        decision
    }

    /// Media URL for `policy` without a token.
    pub fn media_url<P: MediaPolicy>(&self, policy: &P) -> String {
        join_base(&self.media_origin, &policy.media_url_path())
    }

    /// Media URL for `policy` carrying a freshly minted token.
    ///
    /// The token covers the same string [`check_token`](Self::check_token) verifies,
    /// not the path as the URL parser normalizes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the media URL cannot be parsed.
    pub fn authorized_media_url<P: MediaPolicy>(&self, policy: &P) -> Result<String, UrlError> {
        let token = self.signer.sign(&self.signed_path(policy));
        self.codec.embed_token(&self.media_url(policy), &token)
    }

    /// Web domain URL of the view that authorizes `policy`.
    pub fn full_auth_url<P: MediaPolicy>(&self, policy: &P) -> String {
        join_base(&self.site_url, &policy.auth_path())
    }

    /// Decision sending the caller back to the web domain to authenticate.
    pub fn reauthenticate<P: MediaPolicy>(&self, policy: &P) -> Decision {
        Decision::RedirectToAuth(self.full_auth_url(policy))
    }

    /// Verify `token` against the signing path of `policy`.
    ///
    /// # Errors
    ///
    /// Returns the signature error when the token is tampered with or stale.
    pub fn check_token<P: MediaPolicy>(
        &self,
        policy: &P,
        token: &str,
    ) -> Result<SignedToken, SignatureError> {
        let max_age = policy.token_max_age().unwrap_or(self.max_age_secs);
        self.signer.verify(&self.signed_path(policy), token, max_age)?;
        Ok(SignedToken::new(token))
    }

    fn signed_path<P: MediaPolicy>(&self, policy: &P) -> String {
        policy.signing_path(&policy.media_url_path())
    }

    fn evaluate_media<P: MediaPolicy>(
        &self,
        policy: &P,
        context: &AuthorizationContext<'_, P::Caller>,
    ) -> Decision {
        if *context.reference().public() {
            return Decision::ServePublic;
        }
        let Some(token) = context.token() else {
            debug!("No token presented");
            return Decision::TokenMissing;
        };
        match self.check_token(policy, token) {
            Ok(token) => Decision::ServeAuthorized(Some(token)),
            Err(err) => match err.kind() {
                SignatureErrorKind::Expired { .. } => Decision::TokenExpired,
                SignatureErrorKind::SignatureMismatch => Decision::TokenInvalid,
            },
        }
    }

    fn evaluate_web<P: MediaPolicy>(
        &self,
        policy: &P,
        context: &AuthorizationContext<'_, P::Caller>,
    ) -> Decision {
        if *context.reference().public() {
            return Decision::RedirectToMedia(self.media_url(policy));
        }
        if !self.is_permitted(policy, context) {
            debug!("Caller lacks permission");
            return Decision::Deny;
        }
        match self.authorized_media_url(policy) {
            Ok(url) => Decision::RedirectToMedia(url),
            Err(e) => {
                error!(error = %e, "Failed to build authorized media URL");
                Decision::Deny
            }
        }
    }

    fn evaluate_local<P: MediaPolicy>(
        &self,
        policy: &P,
        context: &AuthorizationContext<'_, P::Caller>,
    ) -> Decision {
        if *context.reference().public() {
            return Decision::ServePublic;
        }
        if self.is_permitted(policy, context) {
            return Decision::ServeAuthorized(None);
        }
        let Some(token) = context.token() else {
            return Decision::Deny;
        };
        match self.check_token(policy, token) {
            Ok(token) => Decision::ServeAuthorized(Some(token)),
            Err(err) => {
                debug!(expired = err.is_expired(), "Token rejected in local mode");
                Decision::Deny
            }
        }
    }

    fn is_permitted<P: MediaPolicy>(
        &self,
        policy: &P,
        context: &AuthorizationContext<'_, P::Caller>,
    ) -> bool {
        context
            .caller()
            .is_some_and(|caller| policy.has_explicit_permission(caller))
    }
}
