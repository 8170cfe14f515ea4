//! Cross-domain authorization for protected media.
//!
//! A media request arrives either on the web domain, where the caller has an
//! identity, or on the media domain, where only a signed token in the URL counts.
//! This crate decides what happens to each request.
//!
//! # Architecture
//!
//! 1. **Policy** - [`MediaPolicy`] answers per resource kind: public? which paths? permitted?
//! 2. **Engine** - [`AuthorizationEngine`] turns policy, domain, caller and token into a
//!    [`Decision`](crossmedia_core::Decision)
//! 3. **Dispatcher** - [`RequestDispatcher`] maps the decision to an
//!    [`Action`](crossmedia_core::Action): internal serve, redirect, denial, or direct file
//!    serve in local mode
//!
//! # Example
//!
//! ```
//! use crossmedia_auth::{AuthorizationEngine, MediaPolicy, RequestDispatcher};
//! use crossmedia_core::{Action, Domain, MediaAuthConfig};
//!
//! struct Attachment {
//!     name: String,
//!     owner: String,
//! }
//!
//! impl MediaPolicy for Attachment {
//!     type Caller = str;
//!     fn is_public(&self) -> bool { false }
//!     fn auth_path(&self) -> String { format!("/attachment/{}", self.name) }
//!     fn storage_path(&self) -> String { format!("files/{}", self.name) }
//!     fn has_explicit_permission(&self, caller: &str) -> bool { caller == self.owner }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MediaAuthConfig::default()
//!     .with_secret("secretkey")
//!     .with_site_url("https://www.example.com")
//!     .with_media_url("https://media.example.org/media/");
//! let engine = AuthorizationEngine::from_config(&config)?;
//! let dispatcher = RequestDispatcher::from_config(&config);
//! let attachment = Attachment { name: "q3.pdf".to_string(), owner: "alice".to_string() };
//!
//! // The owner asks the web domain and is sent to the media domain with a token
//! let context = engine.context(&attachment, Domain::Web, Some("alice"), "/attachment/q3.pdf");
//! let decision = engine.evaluate(&attachment, &context);
//! let action = dispatcher.dispatch(Domain::Web, decision, &attachment);
//! let Action::Redirect { location } = action else {
//!     panic!("expected a redirect");
//! };
//! assert!(location.starts_with("https://media.example.org/attachment/q3.pdf?token="));
//!
//! // Following the redirect on the media domain yields a serve instruction
//! let context = engine.context(&attachment, Domain::Media, None, &location);
//! let decision = engine.evaluate(&attachment, &context);
//! let action = dispatcher.dispatch(Domain::Media, decision, &attachment);
//! assert_eq!(
//!     action,
//!     Action::InternalServe {
//!         header: "X-Accel-Redirect".to_string(),
//!         path: "/protected/files/q3.pdf".to_string(),
//!     }
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod dispatcher;
mod engine;
mod policy;
mod urls;

pub use context::AuthorizationContext;
pub use dispatcher::RequestDispatcher;
pub use engine::AuthorizationEngine;
pub use policy::{MediaPolicy, PolicyResolver};
