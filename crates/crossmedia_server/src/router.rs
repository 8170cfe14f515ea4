//! Axum routes for media requests.

use crate::render::render_action;
use crate::{IdentityProvider, MediaService};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri, header::HOST},
    response::{IntoResponse, Response},
    routing::get,
};
use crossmedia_auth::{MediaPolicy, PolicyResolver};
use crossmedia_signing::Clock;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

/// Creates the media router.
///
/// `route` must contain exactly one wildcard parameter naming the media object,
/// e.g. `/attachment/*name`. A `/health` route is always added.
pub fn media_router<R, I, C>(service: MediaService<R, I, C>, route: &str) -> Router
where
    R: PolicyResolver + 'static,
    I: IdentityProvider + 'static,
    R::Policy: MediaPolicy<Caller = I::Caller>,
    C: Clock + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route(route, get(serve_media::<R, I, C>))
        .with_state(Arc::new(service))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Authorize and answer one media request.
async fn serve_media<R, I, C>(
    State(service): State<Arc<MediaService<R, I, C>>>,
    Path(key): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Response
where
    R: PolicyResolver,
    I: IdentityProvider,
    R::Policy: MediaPolicy<Caller = I::Caller>,
    C: Clock,
{
    let host = headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|authority| authority.to_string()));

    let decided = service.decide(&key, host.as_deref(), &headers, &uri.to_string());
    match decided {
        Ok(action) => render_action(action, service.media_root()).await,
        Err(e) if e.is_not_found() => {
            warn!(key = %key, "Unknown media requested");
            StatusCode::NOT_FOUND.into_response()
        }
        Err(e) => {
            error!(error = %e, "Policy lookup failed");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}
