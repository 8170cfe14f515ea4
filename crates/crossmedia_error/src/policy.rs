//! Media policy error types.

/// Kinds of policy resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PolicyErrorKind {
    /// No media object is known under the requested key
    #[display("Unknown resource: {}", _0)]
    UnknownResource(String),
    /// The policy backend could not answer
    #[display("Policy backend unavailable: {}", _0)]
    Unavailable(String),
}

/// Policy error with location tracking.
///
/// # Examples
///
/// ```
/// use crossmedia_error::{PolicyError, PolicyErrorKind};
///
/// let err = PolicyError::new(PolicyErrorKind::UnknownResource("report.pdf".to_string()));
/// assert!(format!("{}", err).contains("Unknown resource"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Policy Error: {} at line {} in {}", kind, line, file)]
pub struct PolicyError {
    /// The kind of error that occurred
    pub kind: PolicyErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PolicyError {
    /// Create a new policy error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PolicyErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PolicyErrorKind {
        &self.kind
    }

    /// Whether the error means the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, PolicyErrorKind::UnknownResource(_))
    }
}
