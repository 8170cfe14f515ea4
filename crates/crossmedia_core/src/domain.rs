//! Request domains.

use serde::{Deserialize, Serialize};

/// The network domain a request arrived on.
///
/// # Examples
///
/// ```
/// use crossmedia_core::Domain;
///
/// assert_eq!(Domain::Media.to_string(), "media");
/// assert!(Domain::Web.has_identity());
/// assert!(!Domain::Media.has_identity());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Host with session context that mints tokens
    #[display("web")]
    Web,
    /// Host serving protected files, trusting only tokens
    #[display("media")]
    Media,
    /// Single process without a reverse proxy, serving bytes itself
    #[display("local_debug")]
    LocalDebug,
}

impl Domain {
    /// Whether requests on this domain carry caller identity.
    pub fn has_identity(&self) -> bool {
        !matches!(self, Domain::Media)
    }
}
