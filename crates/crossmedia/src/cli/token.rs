//! Token minting and checking commands.

use crossmedia::{CrossMediaResult, MediaAuthConfig, PathSigner};
use tracing::{info, instrument};

/// Mint a token for `path` and print it.
#[instrument(skip(config))]
pub fn sign(config: &MediaAuthConfig, path: &str) -> CrossMediaResult<()> {
    let signer = PathSigner::from_config(config)?;
    let token = signer.sign(path);
    info!("Token minted");
    println!("{}", token);
    Ok(())
}

/// Verify `token` for `path`, failing when it is tampered with or stale.
#[instrument(skip(config, token))]
pub fn verify(
    config: &MediaAuthConfig,
    path: &str,
    token: &str,
    max_age: Option<u64>,
) -> CrossMediaResult<()> {
    let signer = PathSigner::from_config(config)?;
    let max_age = max_age.unwrap_or(*config.token_max_age_secs());
    let issued = signer.verify(path, token, max_age)?;
    println!("valid (minted at {}, lifetime {}s)", issued, max_age);
    Ok(())
}
