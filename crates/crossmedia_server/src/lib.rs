//! HTTP adapter for cross-domain media authorization.
//!
//! Wraps the authorization engine and dispatcher in an axum [`Router`](axum::Router).
//! Each request is resolved to a policy, classified by its `Host` header, evaluated
//! and rendered:
//!
//! | Action | Response |
//! |---|---|
//! | internal serve | `200`, empty body, internal redirect header, empty `Content-Type` |
//! | redirect | `302` with `Location` |
//! | deny | `403`, empty body |
//! | direct file serve (debug) | `200` with the file, or `404` |
//!
//! Unknown media objects answer `404`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod files;
mod identity;
mod render;
mod router;
mod service;

pub use files::{read_media, resolve_media_path};
pub use identity::{HeaderIdentity, IdentityProvider};
pub use render::{internal_serve, render_action};
pub use router::media_router;
pub use service::MediaService;
