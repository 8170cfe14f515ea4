//! File-backed media catalog.

use crossmedia_auth::{MediaPolicy, PolicyResolver};
use crossmedia_error::{ConfigError, CrossMediaResult, PolicyError, PolicyErrorKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Route prefix used when the catalog names none.
pub const DEFAULT_ROUTE_PREFIX: &str = "/attachment";

/// One media object listed in a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MediaEntry {
    /// URL name, the last path segment of the auth URL
    name: String,
    /// Path of the file relative to the media root
    file: String,
    /// Whether the file needs no authorization
    #[serde(default)]
    public: bool,
    /// Callers allowed to see a private file
    #[serde(default)]
    readers: Vec<String>,
}

impl MediaEntry {
    /// Create an entry without readers.
    pub fn new(name: impl Into<String>, file: impl Into<String>, public: bool) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            public,
            readers: Vec::new(),
        }
    }

    /// Allow `reader` to see the file.
    pub fn with_reader(mut self, reader: impl Into<String>) -> Self {
        self.readers.push(reader.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default = "default_route_prefix")]
    route_prefix: String,
    #[serde(default)]
    media: Vec<MediaEntry>,
}

fn default_route_prefix() -> String {
    DEFAULT_ROUTE_PREFIX.to_string()
}

/// Media objects known to the server, keyed by name.
///
/// Loaded from TOML:
///
/// ```toml
/// route_prefix = "/attachment"
///
/// [[media]]
/// name = "report.pdf"
/// file = "reports/q3.pdf"
/// readers = ["alice"]
/// ```
///
/// # Examples
///
/// ```
/// use crossmedia::{Catalog, MediaPolicy, PolicyResolver};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = Catalog::from_toml(r#"
///     [[media]]
///     name = "report.pdf"
///     file = "reports/q3.pdf"
///     readers = ["alice"]
/// "#)?;
///
/// let report = catalog.resolve("report.pdf")?;
/// assert_eq!(report.auth_path(), "/attachment/report.pdf");
/// assert!(report.has_explicit_permission("alice"));
/// assert!(!report.has_explicit_permission("bob"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    route_prefix: String,
    entries: HashMap<String, Arc<MediaEntry>>,
}

impl Catalog {
    /// Build a catalog from entries.
    ///
    /// # Errors
    ///
    /// Returns an error for a prefix not starting with `/`, a name that is not a
    /// single URL-safe path segment, or a name listed twice.
    pub fn new(
        route_prefix: impl Into<String>,
        entries: impl IntoIterator<Item = MediaEntry>,
    ) -> Result<Self, ConfigError> {
        let route_prefix = route_prefix.into().trim_end_matches('/').to_string();
        if !route_prefix.starts_with('/') {
            return Err(ConfigError::new(format!(
                "route_prefix must start with '/': {:?}",
                route_prefix
            )));
        }

        let mut map = HashMap::new();
        for entry in entries {
            validate_name(&entry.name)?;
            if entry.file.trim().is_empty() {
                return Err(ConfigError::new(format!(
                    "media '{}' has no file",
                    entry.name
                )));
            }
            let name = entry.name.clone();
            if map.insert(name.clone(), Arc::new(entry)).is_some() {
                return Err(ConfigError::new(format!("media '{}' listed twice", name)));
            }
        }

        Ok(Self {
            route_prefix,
            entries: map,
        })
    }

    /// Parse a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid catalog.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = toml::from_str(text)
            .map_err(|e| ConfigError::new(format!("Failed to parse catalog: {}", e)))?;
        Self::new(file.route_prefix, file.media)
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> CrossMediaResult<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read catalog {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let catalog = Self::from_toml(&text)?;
        info!(entries = catalog.len(), "Loaded media catalog");
        Ok(catalog)
    }

    /// Prefix of every auth URL, without trailing slash.
    pub fn route_prefix(&self) -> &str {
        &self.route_prefix
    }

    /// Axum route serving this catalog, e.g. `/attachment/*name`.
    pub fn route(&self) -> String {
        format!("{}/*name", self.route_prefix)
    }

    /// Number of media objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog lists nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry named `name`.
    pub fn get(&self, name: &str) -> Option<&MediaEntry> {
        self.entries.get(name).map(Arc::as_ref)
    }
}

impl PolicyResolver for Catalog {
    type Policy = CatalogPolicy;

    fn resolve(&self, key: &str) -> Result<CatalogPolicy, PolicyError> {
        let entry = self.entries.get(key).ok_or_else(|| {
            debug!(key, "Not in catalog");
            PolicyError::new(PolicyErrorKind::UnknownResource(key.to_string()))
        })?;
        Ok(CatalogPolicy {
            entry: Arc::clone(entry),
            route_prefix: self.route_prefix.clone(),
        })
    }
}

/// Policy for one catalog entry. Callers are user names.
#[derive(Debug, Clone)]
pub struct CatalogPolicy {
    entry: Arc<MediaEntry>,
    route_prefix: String,
}

impl CatalogPolicy {
    /// The catalog entry.
    pub fn entry(&self) -> &MediaEntry {
        &self.entry
    }
}

impl MediaPolicy for CatalogPolicy {
    type Caller = str;

    fn is_public(&self) -> bool {
        self.entry.public
    }

    fn auth_path(&self) -> String {
        format!("{}/{}", self.route_prefix, self.entry.name)
    }

    fn storage_path(&self) -> String {
        self.entry.file.clone()
    }

    fn has_explicit_permission(&self, caller: &str) -> bool {
        self.entry.readers.iter().any(|reader| reader == caller)
    }
}

/// Names become a single URL path segment and are signed as written, so only
/// unreserved URL characters are allowed.
fn validate_name(name: &str) -> Result<(), ConfigError> {
    let unreserved = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~');
    if name.is_empty() || name == "." || name == ".." || !name.chars().all(unreserved) {
        return Err(ConfigError::new(format!(
            "invalid media name {:?}: use letters, digits, '-', '.', '_' or '~'",
            name
        )));
    }
    Ok(())
}
