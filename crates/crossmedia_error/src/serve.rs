//! Error types for serving media over HTTP.

/// Error kinds for serve operations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum ServeErrorKind {
    /// Failed to read a media file
    #[display("Failed to read media file: {}", _0)]
    FileRead(String),

    /// Media file does not exist
    #[display("Media file not found: {}", _0)]
    NotFound(String),

    /// Requested path resolves outside the media root
    #[display("Path escapes media root: {}", _0)]
    PathTraversal(String),

    /// Failed to bind or run the listener
    #[display("Listener error: {}", _0)]
    Listener(String),

    /// Invalid response header value
    #[display("Invalid header: {}", _0)]
    Header(String),
}

/// Error wrapper with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Serve Error: {} at line {} in {}", kind, line, file)]
pub struct ServeError {
    /// The error kind
    pub kind: ServeErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl ServeError {
    /// Create a new ServeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ServeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ServeErrorKind {
        &self.kind
    }
}
