//! Top-level error wrapper types.

use crate::{ConfigError, PolicyError, ServeError, SignatureError, UrlError};

/// Every error a Crossmedia crate can return.
///
/// # Examples
///
/// ```
/// use crossmedia_error::{CrossMediaError, UrlError};
///
/// let url_err = UrlError::new("empty host");
/// let err: CrossMediaError = url_err.into();
/// assert!(format!("{}", err).contains("URL Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CrossMediaErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// URL parsing error
    #[from(UrlError)]
    Url(UrlError),
    /// Token signature error
    #[from(SignatureError)]
    Signature(SignatureError),
    /// Policy resolution error
    #[from(PolicyError)]
    Policy(PolicyError),
    /// HTTP serving error
    #[from(ServeError)]
    Serve(ServeError),
}

/// Crossmedia error with kind discrimination.
///
/// # Examples
///
/// ```
/// use crossmedia_error::{ConfigError, CrossMediaResult};
///
/// fn might_fail() -> CrossMediaResult<()> {
///     Err(ConfigError::new("Missing secret"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Crossmedia Error: {}", _0)]
pub struct CrossMediaError(Box<CrossMediaErrorKind>);

impl CrossMediaError {
    /// Create a new error from a kind.
    pub fn new(kind: CrossMediaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CrossMediaErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to CrossMediaErrorKind
impl<T> From<T> for CrossMediaError
where
    T: Into<CrossMediaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Crossmedia operations.
pub type CrossMediaResult<T> = std::result::Result<T, CrossMediaError>;
