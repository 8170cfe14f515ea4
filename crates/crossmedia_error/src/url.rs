//! URL error types.

/// URL parsing or rewriting failure with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("URL Error: {} at line {} in {}", message, line, file)]
pub struct UrlError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl UrlError {
    /// Create a new UrlError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use crossmedia_error::UrlError;
    ///
    /// let err = UrlError::new("relative URL without a base");
    /// assert!(err.message.contains("relative"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
