//! Media reference types.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Snapshot of one protected resource.
///
/// Taken once per authorization decision so that the public flag cannot change
/// while the decision is being made.
///
/// # Examples
///
/// ```
/// use crossmedia_core::MediaReference;
///
/// let reference = MediaReference::new("report.pdf", "reports/2024/report.pdf", false);
/// assert_eq!(reference.id(), "report.pdf");
/// assert!(!reference.public());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct MediaReference {
    /// Opaque identifier of the resource
    id: String,
    /// Path of the file relative to the media root
    storage_path: String,
    /// Whether the resource needs no authorization at all
    public: bool,
}

impl MediaReference {
    /// Create a new media reference.
    pub fn new(id: impl Into<String>, storage_path: impl Into<String>, public: bool) -> Self {
        Self {
            id: id.into(),
            storage_path: storage_path.into(),
            public,
        }
    }
}
