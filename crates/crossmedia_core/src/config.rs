//! Configuration for signed media access.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from crossmedia.toml)
//! - User overrides (~/.config/crossmedia/crossmedia.toml or ./crossmedia.toml)
//! - Environment overrides (`CROSSMEDIA_SECRET`, `CROSSMEDIA_DEBUG`, ...)
//!
//! Later sources take precedence over earlier ones.

use config::{Config, Environment, File, FileFormat};
use crossmedia_error::{ConfigError, CrossMediaResult};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../crossmedia.toml");

/// Characters a signature may contain; the separator must not be one of them.
const TOKEN_ALPHABET_EXTRA: &[char] = &['-', '_', '='];

/// Settings shared by the signer, the engine and the dispatcher.
///
/// # Examples
///
/// ```
/// use crossmedia_core::MediaAuthConfig;
///
/// let config = MediaAuthConfig::default()
///     .with_secret("s3cret")
///     .with_media_url("https://media.example.org/media/");
///
/// assert_eq!(*config.token_max_age_secs(), 120);
/// assert_eq!(config.token_param(), "token");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct MediaAuthConfig {
    /// Signing secret
    #[setters(into)]
    #[serde(default)]
    secret: String,

    /// Salt mixed into the signing key
    #[setters(into)]
    #[serde(default = "default_salt")]
    salt: String,

    /// Token lifetime in seconds (0 expires right after issuance)
    #[serde(default = "default_max_age")]
    token_max_age_secs: u64,

    /// Query parameter carrying the token
    #[setters(into)]
    #[serde(default = "default_token_param")]
    token_param: String,

    /// Separator between timestamp and signature inside a token
    #[serde(default = "default_separator")]
    separator: char,

    /// Base URL of the web domain
    #[setters(into)]
    #[serde(default = "default_site_url")]
    site_url: String,

    /// Base URL of the media domain; only its origin is used
    #[setters(into)]
    #[serde(default = "default_media_url")]
    media_url: String,

    /// Prefix of internal-serve paths understood by the reverse proxy
    #[setters(into)]
    #[serde(default = "default_internal_prefix")]
    internal_media_prefix: String,

    /// Header carrying the internal-serve instruction
    #[setters(into)]
    #[serde(default = "default_internal_header")]
    internal_redirect_header: String,

    /// Serve files directly instead of instructing a reverse proxy
    #[serde(default)]
    debug: bool,

    /// Directory files are served from in debug mode
    #[setters(into)]
    #[serde(default = "default_media_root")]
    media_root: PathBuf,
}

fn default_salt() -> String {
    "crossmedia.signing".to_string()
}

fn default_max_age() -> u64 {
    120 // 2 minutes
}

fn default_token_param() -> String {
    "token".to_string()
}

fn default_separator() -> char {
    ':'
}

fn default_site_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_media_url() -> String {
    "/media/".to_string()
}

fn default_internal_prefix() -> String {
    "/protected".to_string()
}

fn default_internal_header() -> String {
    "X-Accel-Redirect".to_string()
}

fn default_media_root() -> PathBuf {
    PathBuf::from("media")
}

impl Default for MediaAuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            salt: default_salt(),
            token_max_age_secs: default_max_age(),
            token_param: default_token_param(),
            separator: default_separator(),
            site_url: default_site_url(),
            media_url: default_media_url(),
            internal_media_prefix: default_internal_prefix(),
            internal_redirect_header: default_internal_header(),
            debug: false,
            media_root: default_media_root(),
        }
    }
}

impl std::fmt::Debug for MediaAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaAuthConfig")
            .field("secret", &"<redacted>")
            .field("salt", &self.salt)
            .field("token_max_age_secs", &self.token_max_age_secs)
            .field("token_param", &self.token_param)
            .field("separator", &self.separator)
            .field("site_url", &self.site_url)
            .field("media_url", &self.media_url)
            .field("internal_media_prefix", &self.internal_media_prefix)
            .field("internal_redirect_header", &self.internal_redirect_header)
            .field("debug", &self.debug)
            .field("media_root", &self.media_root)
            .finish()
    }
}

impl MediaAuthConfig {
    /// Load configuration from a specific file path, layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> CrossMediaResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled default.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use crossmedia_core::MediaAuthConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = MediaAuthConfig::load()?;
    /// println!("tokens live for {}s", config.token_max_age_secs());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> CrossMediaResult<Self> {
        debug!("Loading configuration: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/crossmedia/crossmedia.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("crossmedia").required(false))
            .add_source(Environment::with_prefix("CROSSMEDIA").try_parsing(true));

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Check that the settings can produce and verify tokens and URLs.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty secret or token parameter, a separator that
    /// could appear inside a token, an unparseable site or media URL, or a media URL
    /// without a host outside debug mode.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::new("secret must not be empty"));
        }
        if self.token_param.is_empty() {
            return Err(ConfigError::new("token_param must not be empty"));
        }
        validate_separator(self.separator)?;
        url::Url::parse(&self.site_url)
            .map_err(|e| ConfigError::new(format!("Invalid site_url '{}': {}", self.site_url, e)))?;
        let media_host = match url::Url::parse(&self.media_url) {
            Ok(url) => url.has_host(),
            Err(url::ParseError::RelativeUrlWithoutBase) if self.media_url.starts_with('/') => {
                false
            }
            Err(e) => {
                return Err(ConfigError::new(format!(
                    "Invalid media_url '{}': {}",
                    self.media_url, e
                )));
            }
        };
        // Without a media host every request classifies as web and redirects to itself
        if !media_host && !self.debug {
            return Err(ConfigError::new(format!(
                "media_url '{}' names no media host; use an absolute URL or enable debug",
                self.media_url
            )));
        }
        if self.internal_redirect_header.is_empty() {
            return Err(ConfigError::new("internal_redirect_header must not be empty"));
        }
        Ok(())
    }
}

/// Reject separators that can occur inside the timestamp or signature.
///
/// # Errors
///
/// Returns an error if `separator` is alphanumeric or part of the base64url alphabet.
pub fn validate_separator(separator: char) -> Result<(), ConfigError> {
    if separator.is_ascii_alphanumeric() || TOKEN_ALPHABET_EXTRA.contains(&separator) {
        return Err(ConfigError::new(format!(
            "separator '{}' can occur inside a token",
            separator
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_defaults_parse() {
        let config: MediaAuthConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let defaults = MediaAuthConfig::default();
        assert_eq!(config, defaults);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = MediaAuthConfig::default().with_secret("hunter2");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_separator_rejects_token_alphabet() {
        assert!(validate_separator(':').is_ok());
        assert!(validate_separator('.').is_ok());
        assert!(validate_separator('a').is_err());
        assert!(validate_separator('7').is_err());
        assert!(validate_separator('-').is_err());
        assert!(validate_separator('_').is_err());
    }
}
