//! End-to-end tests for engine and dispatcher across domains.

use crossmedia_auth::{AuthorizationEngine, MediaPolicy, RequestDispatcher};
use crossmedia_core::{Action, Decision, Domain, MediaAuthConfig};
use crossmedia_signing::{ManualClock, PathSigner, TokenCodec};
use std::cell::Cell;
use std::sync::Arc;
use std::time::Duration;

const NOW: u64 = 1_700_000_000;

struct Attachment {
    name: &'static str,
    file: &'static str,
    public: bool,
    readers: &'static [&'static str],
    max_age: Option<u64>,
    permission_checks: Cell<u32>,
}

impl Attachment {
    fn new(name: &'static str, file: &'static str, public: bool) -> Self {
        Self {
            name,
            file,
            public,
            readers: &["superuser"],
            max_age: None,
            permission_checks: Cell::new(0),
        }
    }
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
        self.file.to_string()
    }

    fn has_explicit_permission(&self, caller: &str) -> bool {
        self.permission_checks.set(self.permission_checks.get() + 1);
        self.readers.contains(&caller)
    }

    fn token_max_age(&self) -> Option<u64> {
        self.max_age
    }
}

fn config() -> MediaAuthConfig {
    MediaAuthConfig::default()
        .with_secret("secretkey")
        .with_site_url("https://www.example.com")
        .with_media_url("https://media.example.org/media/")
        .with_internal_media_prefix("/protected/")
}

struct Harness {
    clock: Arc<ManualClock>,
    engine: AuthorizationEngine<Arc<ManualClock>>,
    dispatcher: RequestDispatcher,
}

impl Harness {
    fn new() -> Self {
        let config = config();
        let clock = Arc::new(ManualClock::at_secs(NOW));
        let signer = PathSigner::with_clock(
            config.secret(),
            config.salt(),
            *config.separator(),
            clock.clone(),
        )
        .unwrap();
        Self {
            clock,
            engine: AuthorizationEngine::new(signer, &config),
            dispatcher: RequestDispatcher::from_config(&config),
        }
    }

    fn request(
        &self,
        policy: &Attachment,
        domain: Domain,
        caller: Option<&str>,
        url: &str,
    ) -> (Decision, Action) {
        let context = self.engine.context(policy, domain, caller, url);
        let decision = self.engine.evaluate(policy, &context);
        let action = self.dispatcher.dispatch(domain, decision.clone(), policy);
        (decision, action)
    }
}

fn location(action: &Action) -> &str {
    match action {
        Action::Redirect { location } => location,
        other => panic!("expected redirect, got {:?}", other),
    }
}

#[test]
fn test_public_on_web_redirects_without_token() {
    let harness = Harness::new();
    let public = Attachment::new("public.txt", "test_files/test-public.txt", true);

    let (decision, action) =
        harness.request(&public, Domain::Web, None, "/attachment/public.txt");

    assert_eq!(
        decision,
        Decision::RedirectToMedia("https://media.example.org/attachment/public.txt".to_string())
    );
    assert!(!location(&action).contains("token"));
}

#[test]
fn test_public_on_media_serves_without_token() {
    let harness = Harness::new();
    let public = Attachment::new("public.txt", "test_files/test-public.txt", true);

    let (decision, action) = harness.request(
        &public,
        Domain::Media,
        None,
        "https://media.example.org/attachment/public.txt",
    );

    assert_eq!(decision, Decision::ServePublic);
    assert_eq!(
        action,
        Action::InternalServe {
            header: "X-Accel-Redirect".to_string(),
            path: "/protected/test_files/test-public.txt".to_string(),
        }
    );
}

#[test]
fn test_private_on_web_without_permission_denies() {
    let harness = Harness::new();
    let private = Attachment::new("private.txt", "test_files/test-private.txt", false);

    let (decision, action) =
        harness.request(&private, Domain::Web, Some("visitor"), "/attachment/private.txt");

    assert_eq!(decision, Decision::Deny);
    assert_eq!(action, Action::Deny);
}

#[test]
fn test_anonymous_caller_is_never_checked() {
    let harness = Harness::new();
    let private = Attachment::new("private.txt", "test_files/test-private.txt", false);

    let (decision, _) = harness.request(&private, Domain::Web, None, "/attachment/private.txt");

    assert_eq!(decision, Decision::Deny);
    assert_eq!(private.permission_checks.get(), 0);
}

#[test]
fn test_private_on_media_without_token_redirects_to_auth() {
    let harness = Harness::new();
    let private = Attachment::new("private.txt", "test_files/test-private.txt", false);

    let (decision, action) = harness.request(
        &private,
        Domain::Media,
        None,
        "https://media.example.org/attachment/private.txt",
    );

    assert_eq!(decision, Decision::TokenMissing);
    assert_eq!(
        location(&action),
        "https://www.example.com/attachment/private.txt"
    );
}

#[test]
fn test_granted_flow_round_trip() {
    let harness = Harness::new();
    let private = Attachment::new("private.txt", "test_files/test-private.txt", false);

    let (_, action) =
        harness.request(&private, Domain::Web, Some("superuser"), "/attachment/private.txt");
    let media_url = location(&action).to_string();
    assert!(media_url.starts_with("https://media.example.org/attachment/private.txt?token="));

    // The embedded token is signed over exactly the auth path
    let token = TokenCodec::new("token").extract(&media_url).unwrap();
    assert!(
        harness
            .engine
            .signer()
            .verify("/attachment/private.txt", &token, 120)
            .is_ok()
    );

    let (decision, action) = harness.request(&private, Domain::Media, None, &media_url);
    assert!(matches!(decision, Decision::ServeAuthorized(Some(_))));
    assert_eq!(
        action,
        Action::InternalServe {
            header: "X-Accel-Redirect".to_string(),
            path: "/protected/test_files/test-private.txt".to_string(),
        }
    );
}

#[test]
fn test_expired_token_redirects_like_missing() {
    let harness = Harness::new();
    let mut private = Attachment::new("private.txt", "test_files/test-private.txt", false);
    private.max_age = Some(0);

    let (_, action) =
        harness.request(&private, Domain::Web, Some("superuser"), "/attachment/private.txt");
    let media_url = location(&action).to_string();

    harness.clock.advance(Duration::from_millis(500));

    let (decision, action) = harness.request(&private, Domain::Media, None, &media_url);
    assert_eq!(decision, Decision::TokenExpired);
    assert_eq!(
        location(&action),
        "https://www.example.com/attachment/private.txt"
    );

    // Re-authenticating on the web domain mints a new token
    let (decision, _) =
        harness.request(&private, Domain::Web, Some("superuser"), "/attachment/private.txt");
    assert!(matches!(decision, Decision::RedirectToMedia(url) if url.contains("token=")));
}

#[test]
fn test_configured_max_age_applies_without_override() {
    let harness = Harness::new();
    let private = Attachment::new("private.txt", "test_files/test-private.txt", false);

    let (_, action) =
        harness.request(&private, Domain::Web, Some("superuser"), "/attachment/private.txt");
    let media_url = location(&action).to_string();

    harness.clock.advance(Duration::from_secs(119));
    let (decision, _) = harness.request(&private, Domain::Media, None, &media_url);
    assert!(decision.is_serve());

    harness.clock.advance(Duration::from_secs(2));
    let (decision, _) = harness.request(&private, Domain::Media, None, &media_url);
    assert_eq!(decision, Decision::TokenExpired);
}

#[test]
fn test_corrupted_token_is_hard_denial() {
    let harness = Harness::new();
    let private = Attachment::new("private.txt", "test_files/test-private.txt", false);

    let (_, action) =
        harness.request(&private, Domain::Web, Some("superuser"), "/attachment/private.txt");
    let mut media_url = location(&action).to_string();
    media_url.push('a');

    let (decision, action) = harness.request(&private, Domain::Media, None, &media_url);
    assert_eq!(decision, Decision::TokenInvalid);
    assert_eq!(action, Action::Deny);
}

#[test]
fn test_corrupted_and_stale_token_is_still_denial() {
    let harness = Harness::new();
    let private = Attachment::new("private.txt", "test_files/test-private.txt", false);

    let (_, action) =
        harness.request(&private, Domain::Web, Some("superuser"), "/attachment/private.txt");
    let mut media_url = location(&action).to_string();
    media_url.push('a');
    harness.clock.advance(Duration::from_secs(3600));

    let (decision, _) = harness.request(&private, Domain::Media, None, &media_url);
    assert_eq!(decision, Decision::TokenInvalid);
}

#[test]
fn test_token_for_other_media_is_invalid() {
    let harness = Harness::new();
    let private = Attachment::new("private.txt", "test_files/test-private.txt", false);
    let other = Attachment::new("other.txt", "test_files/other.txt", false);

    let (_, action) =
        harness.request(&other, Domain::Web, Some("superuser"), "/attachment/other.txt");
    let token = TokenCodec::new("token").extract(location(&action)).unwrap();
    let forged = TokenCodec::new("token")
        .embed_token(
            "https://media.example.org/attachment/private.txt",
            &crossmedia_core::SignedToken::new(token),
        )
        .unwrap();

    let (decision, _) = harness.request(&private, Domain::Media, None, &forged);
    assert_eq!(decision, Decision::TokenInvalid);
}

#[test]
fn test_media_domain_ignores_caller_identity() {
    let harness = Harness::new();
    let private = Attachment::new("private.txt", "test_files/test-private.txt", false);

    let (decision, _) = harness.request(
        &private,
        Domain::Media,
        Some("superuser"),
        "https://media.example.org/attachment/private.txt",
    );

    assert_eq!(decision, Decision::TokenMissing);
    assert_eq!(private.permission_checks.get(), 0);
}

#[test]
fn test_local_public_serves_file() {
    let harness = Harness::new();
    let public = Attachment::new("public.txt", "test_files/test-public.txt", true);

    let (decision, action) =
        harness.request(&public, Domain::LocalDebug, None, "/attachment/public.txt");

    assert_eq!(decision, Decision::ServePublic);
    assert_eq!(
        action,
        Action::ServeFile {
            storage_path: "test_files/test-public.txt".to_string()
        }
    );
}

#[test]
fn test_local_private_without_permission_denies() {
    let harness = Harness::new();
    let private = Attachment::new("private.txt", "test_files/test-private.txt", false);

    let (decision, action) =
        harness.request(&private, Domain::LocalDebug, None, "/attachment/private.txt");
    assert_eq!(decision, Decision::Deny);
    assert_eq!(action, Action::Deny);
}

#[test]
fn test_local_private_with_permission_serves_file() {
    let harness = Harness::new();
    let private = Attachment::new("private.txt", "test_files/test-private.txt", false);

    let (decision, action) = harness.request(
        &private,
        Domain::LocalDebug,
        Some("superuser"),
        "/attachment/private.txt",
    );
    assert_eq!(decision, Decision::ServeAuthorized(None));
    assert_eq!(
        action,
        Action::ServeFile {
            storage_path: "test_files/test-private.txt".to_string()
        }
    );
}

#[test]
fn test_local_token_failures_deny_instead_of_redirecting() {
    let harness = Harness::new();
    let mut private = Attachment::new("private.txt", "test_files/test-private.txt", false);
    private.max_age = Some(0);

    let token = harness.engine.signer().sign("/attachment/private.txt");
    let url = TokenCodec::new("token")
        .embed_token("/attachment/private.txt", &token)
        .unwrap();

    // Valid token serves
    let (decision, _) = harness.request(&private, Domain::LocalDebug, None, &url);
    assert!(matches!(decision, Decision::ServeAuthorized(Some(_))));

    // Expired token denies
    harness.clock.advance(Duration::from_secs(1));
    let (decision, action) = harness.request(&private, Domain::LocalDebug, None, &url);
    assert_eq!(decision, Decision::Deny);
    assert_eq!(action, Action::Deny);

    // Broken token denies
    let (decision, _) =
        harness.request(&private, Domain::LocalDebug, None, &format!("{}a", url));
    assert_eq!(decision, Decision::Deny);
}

#[test]
fn test_reauthenticate_points_at_web_domain() {
    let harness = Harness::new();
    let private = Attachment::new("private.txt", "test_files/test-private.txt", false);

    let decision = harness.engine.reauthenticate(&private);
    assert_eq!(
        decision,
        Decision::RedirectToAuth("https://www.example.com/attachment/private.txt".to_string())
    );

    let action = harness.dispatcher.dispatch(Domain::Media, decision, &private);
    assert_eq!(
        location(&action),
        "https://www.example.com/attachment/private.txt"
    );
}

#[test]
fn test_relative_media_url_builds_relative_redirects() {
    let config = config().with_media_url("/media/").with_debug(true);
    let engine = AuthorizationEngine::from_config(&config).unwrap();
    let private = Attachment::new("private.txt", "test_files/test-private.txt", false);

    let context = engine.context(
        &private,
        Domain::Web,
        Some("superuser"),
        "/attachment/private.txt",
    );
    let decision = engine.evaluate(&private, &context);

    assert!(matches!(
        decision,
        Decision::RedirectToMedia(url) if url.starts_with("/attachment/private.txt?token=")
    ));
}

fn assert_granted_token_serves(name: &'static str, expected_url_path: &str) {
    let harness = Harness::new();
    let attachment = Attachment::new(name, "test_files/odd-name.txt", false);
    let auth_path = attachment.auth_path();

    let (_, action) = harness.request(&attachment, Domain::Web, Some("superuser"), &auth_path);
    let media_url = location(&action).to_string();
    assert!(
        media_url.starts_with(&format!("https://media.example.org{}?token=", expected_url_path)),
        "unexpected media URL {}",
        media_url
    );

    let (decision, action) = harness.request(&attachment, Domain::Media, None, &media_url);
    assert!(
        matches!(decision, Decision::ServeAuthorized(Some(_))),
        "{} gave {:?}",
        auth_path,
        decision
    );
    assert_eq!(
        action,
        Action::InternalServe {
            header: "X-Accel-Redirect".to_string(),
            path: "/protected/test_files/odd-name.txt".to_string(),
        }
    );
}

#[test]
fn test_token_survives_encoded_space() {
    assert_granted_token_serves("my report.pdf", "/attachment/my%20report.pdf");
}

#[test]
fn test_token_survives_non_ascii_path() {
    assert_granted_token_serves("résumé.pdf", "/attachment/r%C3%A9sum%C3%A9.pdf");
}

#[test]
fn test_token_survives_dot_segment() {
    assert_granted_token_serves("./a.txt", "/attachment/a.txt");
}

#[test]
fn test_missing_and_expired_need_reauthentication() {
    let harness = Harness::new();
    let private = Attachment::new("private.txt", "test_files/test-private.txt", false);

    let (missing, _) = harness.request(
        &private,
        Domain::Media,
        None,
        "https://media.example.org/attachment/private.txt",
    );
    assert!(missing.needs_reauthentication());
    assert!(harness.engine.reauthenticate(&private).needs_reauthentication());

    let (denied, _) = harness.request(&private, Domain::Web, None, "/attachment/private.txt");
    assert!(!denied.needs_reauthentication());
}
