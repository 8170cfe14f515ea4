//! Mapping of decisions to external actions.

use crate::MediaPolicy;
use crate::urls::join_base;
use crossmedia_core::{Action, Decision, Domain, MediaAuthConfig};
use tracing::{debug, instrument};

/// Turns a [`Decision`] into the [`Action`] the web layer must emit.
///
/// Holds no business logic: every branch is a fixed mapping. Missing and expired
/// tokens redirect to the web domain's auth URL, which is derived from the policy
/// at dispatch time.
///
/// # Examples
///
/// ```
/// use crossmedia_auth::{MediaPolicy, RequestDispatcher};
/// use crossmedia_core::{Action, Decision, Domain, MediaAuthConfig};
///
/// struct Report;
///
/// impl MediaPolicy for Report {
///     type Caller = str;
///     fn is_public(&self) -> bool { false }
///     fn auth_path(&self) -> String { "/reports/q3.pdf".to_string() }
///     fn storage_path(&self) -> String { "reports/q3.pdf".to_string() }
///     fn has_explicit_permission(&self, _caller: &str) -> bool { false }
/// }
///
/// let config = MediaAuthConfig::default().with_site_url("https://www.example.com");
/// let dispatcher = RequestDispatcher::from_config(&config);
///
/// let action = dispatcher.dispatch(Domain::Media, Decision::TokenExpired, &Report);
/// let location = "https://www.example.com/reports/q3.pdf".to_string();
/// assert_eq!(action, Action::Redirect { location });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDispatcher {
    site_url: String,
    internal_prefix: String,
    internal_header: String,
}

impl RequestDispatcher {
    /// Create a dispatcher from explicit settings.
    pub fn new(
        site_url: impl Into<String>,
        internal_prefix: impl Into<String>,
        internal_header: impl Into<String>,
    ) -> Self {
        Self {
            site_url: site_url.into(),
            internal_prefix: internal_prefix.into(),
            internal_header: internal_header.into(),
        }
    }

    /// Create a dispatcher from configuration.
    pub fn from_config(config: &MediaAuthConfig) -> Self {
        Self::new(
            config.site_url(),
            config.internal_media_prefix(),
            config.internal_redirect_header(),
        )
    }

    /// Map `decision`, made for a request on `domain`, to an action.
    #[instrument(skip(self, decision, policy), fields(decision = decision.label()))]
    pub fn dispatch<P: MediaPolicy>(
        &self,
        domain: Domain,
        decision: Decision,
        policy: &P,
    ) -> Action {
        let action = match decision {
            Decision::ServePublic | Decision::ServeAuthorized(_) => match domain {
                Domain::LocalDebug => Action::ServeFile {
                    storage_path: policy.storage_path(),
                },
                Domain::Web | Domain::Media => self.internal_serve(policy),
            },
            Decision::RedirectToMedia(location) | Decision::RedirectToAuth(location) => {
                Action::Redirect { location }
            }
            Decision::Deny | Decision::TokenInvalid => Action::Deny,
            Decision::TokenMissing | Decision::TokenExpired => Action::Redirect {
                location: join_base(&self.site_url, &policy.auth_path()),
            },
        };
        debug!("Dispatched");
        action
    }

    /// Instruction for the reverse proxy to deliver the file behind `policy`.
    ///
    /// The storage path is always placed under the internal prefix, even when it
    /// starts with a slash.
    pub fn internal_serve<P: MediaPolicy>(&self, policy: &P) -> Action {
        Action::InternalServe {
            header: self.internal_header.clone(),
            path: join_base(&self.internal_prefix, &policy.storage_path()),
        }
    }
}
