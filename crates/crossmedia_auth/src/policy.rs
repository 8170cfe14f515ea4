//! The per-resource-kind capability interface.

use crossmedia_core::MediaReference;
use crossmedia_error::PolicyError;

/// Answers the authorization questions for one media object.
///
/// Implemented once per resource kind by the embedding application. One policy
/// instance describes exactly one media object.
///
/// The string signed into a token is `signing_path(media_url_path())` exactly as the
/// policy returns it. The URL carrying the token may be encoded or normalized on the
/// way; verification always recomputes the signed string from the policy.
///
/// # Examples
///
/// ```
/// use crossmedia_auth::MediaPolicy;
///
/// struct Avatar {
///     user: String,
/// }
///
/// impl MediaPolicy for Avatar {
///     type Caller = str;
///
///     fn is_public(&self) -> bool {
///         false
///     }
///
///     fn auth_path(&self) -> String {
///         format!("/avatars/{}", self.user)
///     }
///
///     fn storage_path(&self) -> String {
///         format!("avatars/{}.png", self.user)
///     }
///
///     fn has_explicit_permission(&self, caller: &str) -> bool {
///         caller == self.user
///     }
/// }
///
/// let avatar = Avatar { user: "alice".to_string() };
/// assert_eq!(avatar.reference().id(), "/avatars/alice");
/// assert!(avatar.has_explicit_permission("alice"));
/// ```
pub trait MediaPolicy {
    /// Identity of the caller on the web domain.
    type Caller: ?Sized;

    /// Whether the media needs no authorization at all.
    fn is_public(&self) -> bool;

    /// Path of the view that authorizes this media. Stable and domain independent.
    fn auth_path(&self) -> String;

    /// Path of the file relative to the media root.
    fn storage_path(&self) -> String;

    /// Whether `caller` may see the media. Delegates to the embedder's permission system.
    fn has_explicit_permission(&self, caller: &Self::Caller) -> bool;

    /// Identifier of the media object.
    fn media_id(&self) -> String {
        self.auth_path()
    }

    /// Path of the media URL on the media domain.
    fn media_url_path(&self) -> String {
        self.auth_path()
    }

    /// The string actually signed for `path`.
    fn signing_path(&self, path: &str) -> String {
        path.to_string()
    }

    /// Token lifetime for this kind of media, overriding the configured default.
    fn token_max_age(&self) -> Option<u64> {
        None
    }

    /// Snapshot of the media object for one authorization decision.
    fn reference(&self) -> MediaReference {
        MediaReference::new(self.media_id(), self.storage_path(), self.is_public())
    }
}

/// Looks up the policy for a media object by its route key.
pub trait PolicyResolver: Send + Sync {
    /// Policy type produced.
    type Policy: MediaPolicy;

    /// Resolve `key` (e.g. the file name in the request path).
    ///
    /// # Errors
    ///
    /// Returns `UnknownResource` if nothing is known under `key`.
    fn resolve(&self, key: &str) -> Result<Self::Policy, PolicyError>;
}
