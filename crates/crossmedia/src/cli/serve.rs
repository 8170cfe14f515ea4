//! The `serve` command.

use axum::http::HeaderName;
use crossmedia::{
    Catalog, ConfigError, CrossMediaResult, HeaderIdentity, MediaAuthConfig, MediaService,
    ServeError, ServeErrorKind, media_router,
};
use std::net::SocketAddr;
use std::path::Path;
use tracing::{info, instrument};

/// Serve the catalog at `catalog_path` on `bind` until the process is stopped.
#[instrument(skip(config))]
pub async fn serve(
    config: &MediaAuthConfig,
    catalog_path: &Path,
    bind: SocketAddr,
    identity_header: &str,
) -> CrossMediaResult<()> {
    let header = HeaderName::try_from(identity_header).map_err(|e| {
        ConfigError::new(format!("Invalid identity header '{}': {}", identity_header, e))
    })?;

    let catalog = Catalog::from_file(catalog_path)?;
    let route = catalog.route();
    let service = MediaService::from_config(config, catalog, HeaderIdentity::new(header))?;
    let app = media_router(service, &route);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| ServeError::new(ServeErrorKind::Listener(format!("{}: {}", bind, e))))?;

    info!(
        %bind,
        route = %route,
        debug = config.debug(),
        "Serving media"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| ServeError::new(ServeErrorKind::Listener(e.to_string())))?;

    Ok(())
}
