//! Crossmedia - signed, time-limited access to protected media.
//!
//! Protected files live behind a media domain that carries no login session. The
//! web domain, which knows the caller, checks permission and redirects to the media
//! domain with a short-lived HMAC token in the URL. The media domain verifies the
//! token and tells the reverse proxy (via `X-Accel-Redirect`) to deliver the file.
//!
//! # Architecture
//!
//! - `crossmedia_error` - Error types
//! - `crossmedia_core` - Configuration, domains, decisions and actions
//! - `crossmedia_signing` - Path signer and token codec
//! - `crossmedia_auth` - Media policies, authorization engine and dispatcher
//! - `crossmedia_server` - Axum HTTP adapter
//!
//! This crate re-exports everything and adds a TOML-backed [`Catalog`] of media
//! objects used by the `crossmedia` binary.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use crossmedia::{Catalog, HeaderIdentity, MediaAuthConfig, MediaService, media_router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MediaAuthConfig::load()?;
//!     let catalog = Catalog::from_file("catalog.toml")?;
//!     let route = catalog.route();
//!
//!     let service = MediaService::from_config(&config, catalog, HeaderIdentity::default())?;
//!     let app = media_router(service, &route);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod observability;

pub use catalog::{Catalog, CatalogPolicy, DEFAULT_ROUTE_PREFIX, MediaEntry};
pub use observability::{LoggingConfig, init_logging};

pub use crossmedia_auth::{
    AuthorizationContext, AuthorizationEngine, MediaPolicy, PolicyResolver, RequestDispatcher,
};
pub use crossmedia_core::{
    Action, Decision, Domain, DomainClassifier, MediaAuthConfig, MediaReference, SignedToken,
    validate_separator,
};
pub use crossmedia_error::{
    ConfigError, CrossMediaError, CrossMediaErrorKind, CrossMediaResult, PolicyError,
    PolicyErrorKind, ServeError, ServeErrorKind, SignatureError, SignatureErrorKind, UrlError,
};
pub use crossmedia_server::{
    HeaderIdentity, IdentityProvider, MediaService, internal_serve, media_router, read_media,
    render_action, resolve_media_path,
};
pub use crossmedia_signing::{Clock, ManualClock, PathSigner, SystemClock, TokenCodec, origin};
