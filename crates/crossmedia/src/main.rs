//! Crossmedia CLI binary.
//!
//! - Serve a media catalog over HTTP
//! - Mint and check tokens by hand

use clap::Parser;
use crossmedia::{CrossMediaResult, LoggingConfig, MediaAuthConfig, init_logging};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, serve, sign, verify};

    let cli = Cli::parse();

    init_logging(&LoggingConfig::new(cli.verbose).with_json_logs(cli.json_logs))?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve {
            catalog,
            bind,
            identity_header,
        } => {
            serve(&config, &catalog, bind, &identity_header).await?;
        }

        Commands::Sign { path } => {
            sign(&config, &path)?;
        }

        Commands::Verify {
            path,
            token,
            max_age,
        } => {
            verify(&config, &path, &token, max_age)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> CrossMediaResult<MediaAuthConfig> {
    match path {
        Some(path) => MediaAuthConfig::from_file(path),
        None => MediaAuthConfig::load(),
    }
}
