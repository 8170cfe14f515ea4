//! Token signature error types.

/// Why a signed token was rejected.
///
/// The two kinds are kept apart because callers react differently: a stale token
/// is answered with a re-authentication redirect, a mismatched one with a denial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SignatureErrorKind {
    /// The token is malformed or its signature does not match the path
    #[display("Signature does not match")]
    SignatureMismatch,
    /// The signature is valid but the token is older than the allowed age
    #[display("Signature expired: age {}s exceeds {}s", age_secs, max_age_secs)]
    Expired {
        /// Whole seconds elapsed since the token was minted
        age_secs: u64,
        /// Maximum age that was enforced
        max_age_secs: u64,
    },
}

/// Signature verification error with location tracking.
///
/// The display form never contains the token or any key material.
///
/// # Examples
///
/// ```
/// use crossmedia_error::{SignatureError, SignatureErrorKind};
///
/// let err = SignatureError::new(SignatureErrorKind::SignatureMismatch);
/// assert!(err.is_mismatch());
/// assert!(!err.is_expired());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Signature Error: {} at line {} in {}", kind, line, file)]
pub struct SignatureError {
    /// The kind of error that occurred
    pub kind: SignatureErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SignatureError {
    /// Create a new signature error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SignatureErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SignatureErrorKind {
        &self.kind
    }

    /// Whether the token carried a valid but stale signature.
    pub fn is_expired(&self) -> bool {
        matches!(self.kind, SignatureErrorKind::Expired { .. })
    }

    /// Whether the token was malformed or tampered with.
    pub fn is_mismatch(&self) -> bool {
        matches!(self.kind, SignatureErrorKind::SignatureMismatch)
    }
}
