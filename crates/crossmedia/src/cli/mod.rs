//! Command-line interface module.

mod commands;
mod serve;
mod token;

pub use commands::{Cli, Commands};
pub use serve::serve;
pub use token::{sign, verify};
