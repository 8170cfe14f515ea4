//! Core data types for Crossmedia signed media access.
//!
//! This crate provides the types shared by the signer, the authorization engine,
//! the dispatcher and the HTTP adapter: request domains, media references,
//! decisions, actions, and the configuration they are built from.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classifier;
mod config;
mod decision;
mod domain;
mod reference;

pub use classifier::DomainClassifier;
pub use config::{MediaAuthConfig, validate_separator};
pub use decision::{Action, Decision, SignedToken};
pub use domain::Domain;
pub use reference::MediaReference;
