//! Mapping of the `Host` header to a request domain.

use crate::{Domain, MediaAuthConfig};
use tracing::{debug, instrument};

/// Classifies inbound requests by the host they were addressed to.
///
/// The media host is the `host[:port]` of the configured media URL. Any other host
/// is treated as the web domain. In debug mode every request is local.
///
/// # Examples
///
/// ```
/// use crossmedia_core::{Domain, DomainClassifier, MediaAuthConfig};
///
/// let config = MediaAuthConfig::default()
///     .with_secret("s3cret")
///     .with_media_url("https://media.example.org/media/");
/// let classifier = DomainClassifier::from_config(&config);
///
/// assert_eq!(classifier.classify(Some("media.example.org")), Domain::Media);
/// assert_eq!(classifier.classify(Some("www.example.com")), Domain::Web);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainClassifier {
    media_host: Option<String>,
    debug: bool,
}

impl DomainClassifier {
    /// Create a classifier for an explicit media host.
    pub fn new(media_host: Option<String>, debug: bool) -> Self {
        Self {
            media_host: media_host.map(|host| host.to_ascii_lowercase()),
            debug,
        }
    }

    /// Derive the media host and debug flag from configuration.
    pub fn from_config(config: &MediaAuthConfig) -> Self {
        let media_host = url::Url::parse(config.media_url())
            .ok()
            .and_then(|url| {
                url.host_str().map(|host| match url.port() {
                    Some(port) => format!("{}:{}", host, port),
                    None => host.to_string(),
                })
            });
        Self::new(media_host, *config.debug())
    }

    /// The host that identifies the media domain, if one is configured.
    pub fn media_host(&self) -> Option<&str> {
        self.media_host.as_deref()
    }

    /// Classify a request by its `Host` header value.
    #[instrument(skip(self))]
    pub fn classify(&self, host: Option<&str>) -> Domain {
        if self.debug {
            return Domain::LocalDebug;
        }
        let domain = match (host, self.media_host.as_deref()) {
            (Some(host), Some(media_host)) if host.eq_ignore_ascii_case(media_host) => {
                Domain::Media
            }
            _ => Domain::Web,
        };
        debug!(%domain, "Classified request host");
        domain
    }
}
