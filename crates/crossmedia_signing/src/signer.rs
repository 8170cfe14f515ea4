//! Timestamped HMAC signatures over URL paths.

use crate::{Clock, SystemClock};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use crossmedia_core::{MediaAuthConfig, SignedToken, validate_separator};
use crossmedia_error::{ConfigError, SignatureError, SignatureErrorKind};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::time::{Duration, UNIX_EPOCH};
use tracing::{debug, instrument};

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies paths with an embedded timestamp.
///
/// A token has the form `timestamp SEP signature`, where the timestamp is whole UNIX
/// seconds in decimal and the signature is the base64url (unpadded) HMAC-SHA256 of
/// `path SEP timestamp`. The MAC key is derived from the secret and a salt, so the
/// raw secret is never used directly.
///
/// The signer holds no mutable state and can be shared across threads.
///
/// # Examples
///
/// ```
/// use crossmedia_signing::PathSigner;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let signer = PathSigner::new("secretkey", "crossmedia.signing", ':')?;
/// let token = signer.sign("/attachment/report.pdf");
///
/// assert!(signer.verify("/attachment/report.pdf", token.as_str(), 120).is_ok());
/// assert!(signer.verify("/attachment/other.pdf", token.as_str(), 120).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PathSigner<C = SystemClock> {
    mac: HmacSha256,
    separator: char,
    clock: C,
}

impl PathSigner<SystemClock> {
    /// Create a signer using the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is empty or the separator could appear inside a token.
    pub fn new(secret: &str, salt: &str, separator: char) -> Result<Self, ConfigError> {
        Self::with_clock(secret, salt, separator, SystemClock)
    }

    /// Create a signer from the secret, salt and separator in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured secret or separator is unusable.
    pub fn from_config(config: &MediaAuthConfig) -> Result<Self, ConfigError> {
        Self::new(config.secret(), config.salt(), *config.separator())
    }
}

impl<C: Clock> PathSigner<C> {
    /// Create a signer reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is empty or the separator could appear inside a token.
    pub fn with_clock(
        secret: &str,
        salt: &str,
        separator: char,
        clock: C,
    ) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::new("signing secret must not be empty"));
        }
        validate_separator(separator)?;

        let key = Sha256::new()
            .chain_update(salt.as_bytes())
            .chain_update(b"signer")
            .chain_update(secret.as_bytes())
            .finalize();
        let mac = HmacSha256::new_from_slice(&key)
            .map_err(|e| ConfigError::new(format!("Invalid signing key: {}", e)))?;

        Ok(Self {
            mac,
            separator,
            clock,
        })
    }

    /// Separator between timestamp and signature.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Sign `path` with the current time.
    #[instrument(skip(self))]
    pub fn sign(&self, path: &str) -> SignedToken {
        let timestamp = self
            .clock
            .now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        debug!(timestamp, "Signing path");
        self.sign_at(path, timestamp)
    }

    /// Sign `path` as if minted at `timestamp` (whole UNIX seconds).
    pub fn sign_at(&self, path: &str, timestamp: u64) -> SignedToken {
        let timestamp = timestamp.to_string();
        let signature = URL_SAFE_NO_PAD.encode(self.signature(path, &timestamp));
        SignedToken::new(format!("{}{}{}", timestamp, self.separator, signature))
    }

    /// Verify that `token` was minted for `path` no more than `max_age_secs` ago.
    ///
    /// Returns the timestamp the token was minted at.
    ///
    /// # Errors
    ///
    /// - `SignatureMismatch` if the token is malformed or was not minted for `path`
    ///   with this key
    /// - `Expired` if the signature is valid but the token is older than `max_age_secs`.
    ///   Age is measured with sub-second precision, so a `max_age_secs` of zero expires
    ///   a token right after it was minted.
    #[instrument(skip(self, token))]
    pub fn verify(
        &self,
        path: &str,
        token: &str,
        max_age_secs: u64,
    ) -> Result<u64, SignatureError> {
        let mismatch = || SignatureError::new(SignatureErrorKind::SignatureMismatch);

        let (timestamp, signature) = token.rsplit_once(self.separator).ok_or_else(mismatch)?;
        if timestamp.is_empty() || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
            debug!("Token timestamp is malformed");
            return Err(mismatch());
        }
        let signature = URL_SAFE_NO_PAD.decode(signature).map_err(|_| mismatch())?;

        let mut mac = self.mac.clone();
        self.feed(&mut mac, path, timestamp);
        if mac.verify_slice(&signature).is_err() {
            debug!("Token signature does not match");
            return Err(mismatch());
        }

        let issued: u64 = timestamp.parse().map_err(|_| mismatch())?;
        let issued_at = UNIX_EPOCH
            .checked_add(Duration::from_secs(issued))
            .ok_or_else(mismatch)?;
        let age = self
            .clock
            .now()
            .duration_since(issued_at)
            .unwrap_or(Duration::ZERO);

        if age > Duration::from_secs(max_age_secs) {
            debug!(age_secs = age.as_secs(), max_age_secs, "Token expired");
            return Err(SignatureError::new(SignatureErrorKind::Expired {
                age_secs: age.as_secs(),
                max_age_secs,
            }));
        }

        Ok(issued)
    }

    fn signature(&self, path: &str, timestamp: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        self.feed(&mut mac, path, timestamp);
        mac.finalize().into_bytes().to_vec()
    }

    fn feed(&self, mac: &mut HmacSha256, path: &str, timestamp: &str) {
        let mut separator = [0u8; 4];
        mac.update(path.as_bytes());
        mac.update(self.separator.encode_utf8(&mut separator).as_bytes());
        mac.update(timestamp.as_bytes());
    }
}

impl<C> std::fmt::Debug for PathSigner<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathSigner")
            .field("key", &"<redacted>")
            .field("separator", &self.separator)
            .finish()
    }
}
