//! Rendering of actions as HTTP responses.

use crate::files::read_media;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use crossmedia_core::Action;
use crossmedia_error::{ServeError, ServeErrorKind};
use std::path::Path;
use tracing::{error, warn};

/// Turn `action` into a response, reading from `media_root` for direct serves.
pub async fn render_action(action: Action, media_root: &Path) -> Response {
    match action {
        Action::InternalServe { header, path } => match internal_serve(&header, &path) {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Failed to build internal serve response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
        Action::Redirect { location } => match HeaderValue::try_from(location) {
            Ok(location) => (StatusCode::FOUND, [(LOCATION, location)]).into_response(),
            Err(e) => {
                error!(error = %e, "Redirect location is not a valid header value");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
        Action::Deny => StatusCode::FORBIDDEN.into_response(),
        Action::ServeFile { storage_path } => match read_media(media_root, &storage_path).await {
            Ok(bytes) => (StatusCode::OK, bytes).into_response(),
            Err(e) => match e.kind() {
                ServeErrorKind::NotFound(_) | ServeErrorKind::PathTraversal(_) => {
                    warn!(error = %e, "Media file unavailable");
                    StatusCode::NOT_FOUND.into_response()
                }
                _ => {
                    error!(error = %e, "Failed to serve media file");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            },
        },
    }
}

/// Empty 200 response carrying the internal-serve header.
///
/// The content type is left empty for the reverse proxy to fill in.
pub fn internal_serve(header: &str, path: &str) -> Result<Response, ServeError> {
    let name = HeaderName::try_from(header)
        .map_err(|e| ServeError::new(ServeErrorKind::Header(format!("{}: {}", header, e))))?;
    let value = HeaderValue::try_from(path)
        .map_err(|e| ServeError::new(ServeErrorKind::Header(format!("{}: {}", path, e))))?;

    let mut response = Response::new(Body::empty());
    let headers = response.headers_mut();
    headers.insert(name, value);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(""));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_serve_headers() {
        let response = internal_serve("X-Accel-Redirect", "/protected/a.txt").unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-accel-redirect"], "/protected/a.txt");
        assert_eq!(response.headers()[CONTENT_TYPE], "");
    }

    #[test]
    fn test_internal_serve_rejects_bad_header() {
        let err = internal_serve("Bad Header", "/protected/a.txt").unwrap_err();
        assert!(matches!(err.kind(), ServeErrorKind::Header(_)));
    }

    #[tokio::test]
    async fn test_render_deny_is_empty_forbidden() {
        let response = render_action(Action::Deny, Path::new("media")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_render_redirect() {
        let response = render_action(
            Action::Redirect {
                location: "https://www.example.com/attachment/a.txt".to_string(),
            },
            Path::new("media"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[LOCATION],
            "https://www.example.com/attachment/a.txt"
        );
    }

    #[tokio::test]
    async fn test_render_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let response = render_action(
            Action::ServeFile {
                storage_path: "nope.txt".to_string(),
            },
            dir.path(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
