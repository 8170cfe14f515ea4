//! Embedding and extracting tokens in URL query strings.

use crossmedia_core::{MediaAuthConfig, SignedToken};
use crossmedia_error::UrlError;
use tracing::{debug, instrument};
use url::{Position, Url};

/// Base used to parse origin-relative URLs such as `/attachment/a.txt?x=1`.
const RELATIVE_BASE: &str = "http://relative.invalid";

/// Carries signed tokens in a URL query parameter.
///
/// Only the URL's path is ever signed, so a token stays valid whatever host, query
/// parameters or fragment surround it.
///
/// # Examples
///
/// ```
/// use crossmedia_core::SignedToken;
/// use crossmedia_signing::TokenCodec;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let codec = TokenCodec::new("token");
/// let url = codec.embed("https://media.example.org/a.txt?size=large", |path| {
///     assert_eq!(path, "/a.txt");
///     SignedToken::new("1700000000:sig")
/// })?;
///
/// assert_eq!(codec.extract(&url).as_deref(), Some("1700000000:sig"));
/// assert!(url.contains("size=large"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCodec {
    param: String,
}

impl TokenCodec {
    /// Create a codec using `param` as the query parameter name.
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
        }
    }

    /// Create a codec using the configured token parameter.
    pub fn from_config(config: &MediaAuthConfig) -> Self {
        Self::new(config.token_param())
    }

    /// Name of the token query parameter.
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Sign the path of `url` with `sign` and put the token into its query string.
    ///
    /// Other query parameters keep their order, an existing token parameter is
    /// replaced, and the fragment is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` cannot be parsed.
    #[instrument(skip(self, url, sign))]
    pub fn embed<F>(&self, url: &str, sign: F) -> Result<String, UrlError>
    where
        F: FnOnce(&str) -> SignedToken,
    {
        let mut parsed = ParsedUrl::parse(url)?;
        let token = sign(parsed.url.path());
        parsed.set_token(&self.param, token.as_str());
        Ok(parsed.into_string())
    }

    /// Put an already minted token into the query string of `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` cannot be parsed.
    pub fn embed_token(&self, url: &str, token: &SignedToken) -> Result<String, UrlError> {
        self.embed(url, |_| token.clone())
    }

    /// Read the token from the query string of `url`, if present.
    ///
    /// Nothing is validated; an unparseable URL has no token.
    pub fn extract(&self, url: &str) -> Option<String> {
        let parsed = ParsedUrl::parse(url).ok()?;
        let token = parsed
            .url
            .query_pairs()
            .find(|(key, _)| key == self.param.as_str())
            .map(|(_, value)| value.into_owned());
        debug!(present = token.is_some(), "Extracted token");
        token
    }
}

/// Scheme, host and port of `url`, or the empty string for a relative URL.
///
/// # Examples
///
/// ```
/// use crossmedia_signing::origin;
///
/// assert_eq!(origin("https://media.example.org/media/"), "https://media.example.org");
/// assert_eq!(origin("http://localhost:9000/media/"), "http://localhost:9000");
/// assert_eq!(origin("/media/"), "");
/// ```
pub fn origin(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => parsed[..Position::BeforePath].to_string(),
        _ => String::new(),
    }
}

/// A URL that remembers whether it was origin-relative.
struct ParsedUrl {
    url: Url,
    relative: bool,
}

impl ParsedUrl {
    fn parse(input: &str) -> Result<Self, UrlError> {
        match Url::parse(input) {
            Ok(url) => Ok(Self {
                url,
                relative: false,
            }),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(RELATIVE_BASE)
                    .map_err(|e| UrlError::new(format!("Invalid relative base: {}", e)))?;
                let url = base
                    .join(input)
                    .map_err(|e| UrlError::new(format!("Invalid URL '{}': {}", input, e)))?;
                Ok(Self {
                    url,
                    relative: true,
                })
            }
            Err(e) => Err(UrlError::new(format!("Invalid URL '{}': {}", input, e))),
        }
    }

    fn set_token(&mut self, param: &str, token: &str) {
        let kept: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(key, _)| key != param)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut query = self.url.query_pairs_mut();
        query.clear();
        query.extend_pairs(kept);
        query.append_pair(param, token);
    }

    fn into_string(self) -> String {
        if self.relative {
            self.url[Position::BeforePath..].to_string()
        } else {
            self.url.into()
        }
    }
}
