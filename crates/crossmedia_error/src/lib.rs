//! Error types for the Crossmedia library.
//!
//! This crate provides the error types used throughout the Crossmedia workspace.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use crossmedia_error::{CrossMediaResult, ConfigError};
//!
//! fn load_secret() -> CrossMediaResult<String> {
//!     Err(ConfigError::new("secret must not be empty"))?
//! }
//!
//! match load_secret() {
//!     Ok(secret) => println!("Got {} bytes", secret.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod policy;
mod serve;
mod signature;
mod url;

pub use config::ConfigError;
pub use error::{CrossMediaError, CrossMediaErrorKind, CrossMediaResult};
pub use policy::{PolicyError, PolicyErrorKind};
pub use serve::{ServeError, ServeErrorKind};
pub use signature::{SignatureError, SignatureErrorKind};
pub use url::UrlError;
