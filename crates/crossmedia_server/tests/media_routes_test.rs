//! Router tests driving whole requests through the media routes.

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, HOST, LOCATION};
use axum::http::{Request, Response, StatusCode};
use crossmedia_auth::{AuthorizationEngine, MediaPolicy, PolicyResolver};
use crossmedia_core::MediaAuthConfig;
use crossmedia_error::{PolicyError, PolicyErrorKind};
use crossmedia_server::{HeaderIdentity, MediaService, media_router};
use crossmedia_signing::{ManualClock, PathSigner};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const WEB: &str = "www.example.com";
const MEDIA: &str = "media.example.org";

#[derive(Debug, Clone)]
struct Attachment {
    name: String,
    file: String,
    public: bool,
}

impl MediaPolicy for Attachment {
    type Caller = str;

    fn is_public(&self) -> bool {
        self.public
    }

    fn auth_path(&self) -> String {
        format!("/attachment/{}", self.name)
    }

    fn storage_path(&self) -> String {
        self.file.clone()
    }

    fn has_explicit_permission(&self, caller: &str) -> bool {
        caller == "superuser"
    }
}

#[derive(Debug)]
struct Attachments;

impl PolicyResolver for Attachments {
    type Policy = Attachment;

    fn resolve(&self, key: &str) -> Result<Attachment, PolicyError> {
        let (file, public) = match key {
            "public.txt" => ("test_files/test-public.txt", true),
            "private.txt" => ("test_files/test-private.txt", false),
            "offline.txt" => {
                return Err(PolicyError::new(PolicyErrorKind::Unavailable(
                    "catalog backend down".to_string(),
                )));
            }
            _ => {
                return Err(PolicyError::new(PolicyErrorKind::UnknownResource(
                    key.to_string(),
                )));
            }
        };
        Ok(Attachment {
            name: key.to_string(),
            file: file.to_string(),
            public,
        })
    }
}

fn config() -> MediaAuthConfig {
    MediaAuthConfig::default()
        .with_secret("secretkey")
        .with_site_url("https://www.example.com")
        .with_media_url("https://media.example.org/media/")
        .with_internal_media_prefix("/protected/")
}

fn app(config: &MediaAuthConfig) -> (Router, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at_secs(1_700_000_000));
    let signer = PathSigner::with_clock(
        config.secret(),
        config.salt(),
        *config.separator(),
        clock.clone(),
    )
    .unwrap();
    let engine = AuthorizationEngine::new(signer, config);
    let service = MediaService::new(engine, config, Attachments, HeaderIdentity::default());
    (media_router(service, "/attachment/*name"), clock)
}

async fn get(app: &Router, host: &str, uri: &str, user: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().uri(uri).header(HOST, host);
    if let Some(user) = user {
        request = request.header("x-remote-user", user);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn location(response: &Response<Body>) -> String {
    response.headers()[LOCATION].to_str().unwrap().to_string()
}

fn assert_internal_serve(response: &Response<Body>, path: &str) {
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-accel-redirect"], path);
    assert_eq!(response.headers()[CONTENT_TYPE], "");
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app(&config());
    let response = get(&app, WEB, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body(response).await, br#"{"status":"ok"}"#);
}

#[tokio::test]
async fn test_public_on_media_is_sent_internally() {
    let (app, _) = app(&config());
    let response = get(&app, MEDIA, "/attachment/public.txt", None).await;
    assert_internal_serve(&response, "/protected/test_files/test-public.txt");
    assert!(body(response).await.is_empty());
}

#[tokio::test]
async fn test_public_on_web_redirects_to_media() {
    let (app, _) = app(&config());
    let response = get(&app, WEB, "/attachment/public.txt", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "https://media.example.org/attachment/public.txt"
    );
}

#[tokio::test]
async fn test_private_forbidden_on_web() {
    let (app, _) = app(&config());
    let response = get(&app, WEB, "/attachment/private.txt", Some("visitor")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(LOCATION).is_none());
    assert!(body(response).await.is_empty());
}

#[tokio::test]
async fn test_private_granted_round_trip() {
    let (app, _) = app(&config());
    let response = get(&app, WEB, "/attachment/private.txt", Some("superuser")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let media_url = location(&response);
    assert!(media_url.starts_with("https://media.example.org/attachment/private.txt?token="));

    let response = get(&app, MEDIA, &media_url, None).await;
    assert_internal_serve(&response, "/protected/test_files/test-private.txt");
}

#[tokio::test]
async fn test_private_missing_token_redirects_to_auth() {
    let (app, _) = app(&config());
    let response = get(&app, MEDIA, "/attachment/private.txt", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "https://www.example.com/attachment/private.txt"
    );
}

#[tokio::test]
async fn test_media_domain_ignores_identity_header() {
    let (app, _) = app(&config());
    let response = get(&app, MEDIA, "/attachment/private.txt", Some("superuser")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "https://www.example.com/attachment/private.txt"
    );
}

#[tokio::test]
async fn test_private_expired_token_redirects_to_auth() {
    let (app, clock) = app(&config());
    let response = get(&app, WEB, "/attachment/private.txt", Some("superuser")).await;
    let media_url = location(&response);

    clock.advance(Duration::from_secs(121));

    let response = get(&app, MEDIA, &media_url, None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "https://www.example.com/attachment/private.txt"
    );
}

#[tokio::test]
async fn test_private_broken_token_is_forbidden() {
    let (app, _) = app(&config());
    let response = get(&app, WEB, "/attachment/private.txt", Some("superuser")).await;
    let media_url = format!("{}a", location(&response));

    let response = get(&app, MEDIA, &media_url, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(LOCATION).is_none());
    assert!(body(response).await.is_empty());
}

#[tokio::test]
async fn test_unknown_media_is_not_found() {
    let (app, _) = app(&config());
    let response = get(&app, MEDIA, "/attachment/missing.txt", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resolver_failure_is_service_unavailable() {
    let (app, _) = app(&config());
    let response = get(&app, MEDIA, "/attachment/offline.txt", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body(response).await.is_empty());
}

fn debug_config(root: &Path) -> MediaAuthConfig {
    std::fs::create_dir_all(root.join("test_files")).unwrap();
    std::fs::write(root.join("test_files/test-public.txt"), b"public content").unwrap();
    std::fs::write(root.join("test_files/test-private.txt"), b"private content").unwrap();
    config().with_debug(true).with_media_root(root.to_path_buf())
}

#[tokio::test]
async fn test_debug_public_served_directly() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = app(&debug_config(dir.path()));

    let response = get(&app, "localhost:8000", "/attachment/public.txt", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-accel-redirect").is_none());
    assert_eq!(body(response).await, b"public content");
}

#[tokio::test]
async fn test_debug_private_forbidden() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = app(&debug_config(dir.path()));

    let response = get(&app, "localhost:8000", "/attachment/private.txt", None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(body(response).await.is_empty());
}

#[tokio::test]
async fn test_debug_private_granted_served_directly() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = app(&debug_config(dir.path()));

    let response = get(
        &app,
        "localhost:8000",
        "/attachment/private.txt",
        Some("superuser"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body(response).await, b"private content");
}

#[tokio::test]
async fn test_debug_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = debug_config(dir.path());
    std::fs::remove_file(dir.path().join("test_files/test-public.txt")).unwrap();
    let (app, _) = app(&config);

    let response = get(&app, "localhost:8000", "/attachment/public.txt", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
