use super::*;
use async_trait::async_trait;
use serde_json::json;
use std::cell::{Cell, RefCell};

use crate::net::types::{AuthTypeResponse, CallbackResponse};
use crate::state::auth::SessionPhase;
use crate::state::notices::NoticeLevel;
use crate::util::storage::{MemoryStore, load_json};

const POPUP_ORIGIN: &str = "https://studio.example.com";

// =========================================================================
// MockApi
// =========================================================================

struct MockApi {
    auth_type: AuthTypeResponse,
    me: Result<User, AuthError>,
    login_url: Result<String, AuthError>,
    callback: Result<CallbackResponse, AuthError>,
    logout: Result<(), AuthError>,
    seen_token: RefCell<Option<String>>,
    login_calls: Cell<usize>,
    logout_calls: Cell<usize>,
}

impl MockApi {
    fn new() -> Self {
        Self {
            auth_type: AuthTypeResponse { kind: AuthType::new("takin"), exclude_paths: Vec::new() },
            me: Ok(User::new("u1", "Alice")),
            login_url: Ok("https://idp.test/authorize".into()),
            callback: Err(AuthError::Auth("no callback configured".into())),
            logout: Ok(()),
            seen_token: RefCell::new(None),
            login_calls: Cell::new(0),
            logout_calls: Cell::new(0),
        }
    }

    fn with_me(mut self, me: Result<User, AuthError>) -> Self {
        self.me = me;
        self
    }

    fn with_auth_type(mut self, kind: &str) -> Self {
        self.auth_type = AuthTypeResponse { kind: AuthType::new(kind), exclude_paths: Vec::new() };
        self
    }
}

#[async_trait(?Send)]
impl AuthApi for MockApi {
    async fn get_login_url(&self) -> Result<String, AuthError> {
        self.login_calls.set(self.login_calls.get() + 1);
        self.login_url.clone()
    }

    async fn handle_callback(&self, _code: &str, _state: Option<&str>) -> Result<CallbackResponse, AuthError> {
        self.callback.clone()
    }

    async fn get_current_user(&self, token: Option<&str>) -> Result<User, AuthError> {
        *self.seen_token.borrow_mut() = token.map(str::to_owned);
        self.me.clone()
    }

    async fn check_auth_type(&self) -> AuthTypeResponse {
        self.auth_type.clone()
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.logout_calls.set(self.logout_calls.get() + 1);
        self.logout.clone()
    }
}

// =========================================================================
// RecordingEffects
// =========================================================================

#[derive(Default)]
struct RecordingEffects {
    notices: RefCell<Vec<Notice>>,
    navigations: RefCell<Vec<String>>,
    changes: Cell<usize>,
}

impl SessionEffects for RecordingEffects {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }

    fn navigate(&self, path: &str) {
        self.navigations.borrow_mut().push(path.to_owned());
    }

    fn session_changed(&self, _state: &AuthState) {
        self.changes.set(self.changes.get() + 1);
    }
}

type TestSession = SessionContext<MockApi, MemoryStore, RecordingEffects>;

fn config() -> AuthConfig {
    AuthConfig::default().with_trusted_origin(POPUP_ORIGIN).unwrap()
}

fn session(api: MockApi) -> TestSession {
    SessionContext::new(config(), api, MemoryStore::new(), RecordingEffects::default())
}

fn success_message() -> Value {
    json!({"type": "auth-success", "token": "t", "user": {"id": "1", "name": "A"}})
}

// =========================================================================
// initialize
// =========================================================================

#[tokio::test]
async fn initialize_with_valid_user_authenticates() {
    let session = session(MockApi::new());
    session.initialize().await;

    let state = session.state();
    assert!(state.is_authenticated());
    assert!(!state.is_loading());
    assert_eq!(state.auth_type().as_str(), "takin");
    assert_eq!(state.phase(), SessionPhase::Authenticated);
    assert_eq!(session.user().map(|u| u.name), Some("Alice".to_owned()));
}

#[tokio::test]
async fn initialize_with_401_is_anonymous_and_not_loading() {
    let session = session(MockApi::new().with_me(Err(AuthError::Unauthorized)));
    session.initialize().await;

    assert!(!session.is_authenticated());
    assert!(!session.is_loading());
    assert_eq!(session.state().phase(), SessionPhase::Anonymous);
}

#[tokio::test]
async fn initialize_network_failure_still_clears_loading() {
    let session = session(MockApi::new().with_me(Err(AuthError::transport("connection refused"))));
    session.initialize().await;

    assert!(!session.is_loading());
    assert!(!session.is_authenticated());
    assert!(session.effects().notices.borrow().is_empty(), "load errors are not shown");
}

#[tokio::test]
async fn initialize_failure_clears_cached_token_and_user() {
    let session = session(MockApi::new().with_me(Err(AuthError::Unauthorized)));
    session.store().set(TOKEN_KEY, "stale");
    session.store().set(USER_INFO_KEY, r#"{"id":"old","name":"Old"}"#);
    session.initialize().await;

    assert_eq!(session.api().seen_token.borrow().as_deref(), Some("stale"));
    assert!(!session.store().contains(TOKEN_KEY));
    assert!(!session.store().contains(USER_INFO_KEY));
}

#[tokio::test]
async fn initialize_mirrors_user_to_store() {
    let session = session(MockApi::new());
    session.initialize().await;
    let cached: Option<User> = load_json(session.store(), USER_INFO_KEY);
    assert_eq!(cached, Some(User::new("u1", "Alice")));
}

#[tokio::test]
async fn initialize_runs_once() {
    let session = session(MockApi::new());
    session.initialize().await;
    let changes = session.effects().changes.get();
    session.initialize().await;
    assert_eq!(session.effects().changes.get(), changes);
}

#[tokio::test]
async fn repeated_initialize_reports_no_change() {
    let session = session(MockApi::new());
    session.initialize().await;
    session.initialize().await;
    assert_eq!(session.effects().changes.get(), 2);
}

#[tokio::test]
async fn message_before_initialize_still_clears_loading() {
    let session = session(MockApi::new().with_me(Err(AuthError::Unauthorized)));
    assert_eq!(session.handle_message(POPUP_ORIGIN, &success_message()), MessageOutcome::SignedIn);

    session.initialize().await;

    assert!(!session.is_loading());
    assert_eq!(session.state().auth_type().as_str(), "takin");
}

#[tokio::test]
async fn logout_before_initialize_still_clears_loading() {
    let session = session(MockApi::new());
    session.logout().await;

    session.initialize().await;

    assert!(!session.is_loading());
    assert_eq!(session.state().phase(), SessionPhase::Authenticated);
}

#[tokio::test]
async fn initialize_reports_state_changes() {
    let session = session(MockApi::new());
    session.initialize().await;
    assert_eq!(session.effects().changes.get(), 2, "begin and finish");
}

// =========================================================================
// login
// =========================================================================

#[tokio::test]
async fn login_with_no_auth_returns_empty_without_request() {
    let session = session(MockApi::new().with_auth_type("none"));
    session.initialize().await;

    assert_eq!(session.login().await, "");
    assert_eq!(session.api().login_calls.get(), 0);
}

#[tokio::test]
async fn login_returns_url_from_backend() {
    let session = session(MockApi::new());
    session.initialize().await;
    assert_eq!(session.login().await, "https://idp.test/authorize");
}

#[tokio::test]
async fn login_failure_shows_notice_and_returns_empty() {
    let mut api = MockApi::new();
    api.login_url = Err(AuthError::Protocol("response has no login_url".into()));
    let session = session(api);
    session.initialize().await;

    assert_eq!(session.login().await, "");
    let notices = session.effects().notices.borrow();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].text, "Failed to initiate login");
}

// =========================================================================
// logout
// =========================================================================

#[tokio::test]
async fn logout_clears_state_and_navigates() {
    let session = session(MockApi::new());
    session.initialize().await;
    session.store().set(TOKEN_KEY, "t");
    session.logout().await;

    assert!(session.user().is_none());
    assert!(!session.store().contains(TOKEN_KEY));
    assert!(!session.store().contains(USER_INFO_KEY));
    assert_eq!(session.api().logout_calls.get(), 1);
    assert_eq!(*session.effects().navigations.borrow(), vec![LOGIN_ROUTE.to_owned()]);
}

#[tokio::test]
async fn logout_succeeds_locally_when_backend_fails() {
    let mut api = MockApi::new();
    api.logout = Err(AuthError::transport("offline"));
    let session = session(api);
    session.initialize().await;
    session.logout().await;

    assert!(session.user().is_none());
    assert_eq!(*session.effects().navigations.borrow(), vec![LOGIN_ROUTE.to_owned()]);
    let notices = session.effects().notices.borrow();
    assert!(notices.iter().all(|n| n.level != NoticeLevel::Error));
}

// =========================================================================
// handle_message
// =========================================================================

#[tokio::test]
async fn trusted_success_message_signs_in() {
    let session = session(MockApi::new().with_me(Err(AuthError::Unauthorized)));
    session.initialize().await;

    let outcome = session.handle_message(POPUP_ORIGIN, &success_message());
    assert_eq!(outcome, MessageOutcome::SignedIn);
    assert_eq!(session.user(), Some(User::new("1", "A")));
    assert_eq!(session.state().phase(), SessionPhase::Authenticated);
    assert_eq!(session.store().get(TOKEN_KEY).as_deref(), Some("t"));
    assert_eq!(*session.effects().navigations.borrow(), vec!["/".to_owned()]);
    assert_eq!(session.effects().notices.borrow()[0], Notice::success("Successfully logged in"));
}

#[test]
fn untrusted_origin_never_changes_state() {
    let session = session(MockApi::new());
    let before = session.state();
    for origin in ["https://evil.test", "http://studio.example.com", "null", ""] {
        assert_eq!(session.handle_message(origin, &success_message()), MessageOutcome::UntrustedOrigin);
    }
    assert_eq!(session.state(), before);
    assert!(session.effects().notices.borrow().is_empty());
    assert!(session.effects().navigations.borrow().is_empty());
    assert!(!session.store().contains(TOKEN_KEY));
}

#[test]
fn success_without_token_or_user_never_changes_state() {
    let session = session(MockApi::new());
    let before = session.state();
    let payloads = [
        json!({"type": "auth-success", "user": {"id": "1", "name": "A"}}),
        json!({"type": "auth-success", "token": "t"}),
        json!({"type": "auth-success", "token": "t", "user": {"name": "A"}}),
    ];
    for payload in &payloads {
        assert_eq!(session.handle_message(POPUP_ORIGIN, payload), MessageOutcome::Invalid);
    }
    assert_eq!(session.state(), before);
    assert!(session.effects().notices.borrow().is_empty());
}

#[test]
fn success_with_script_avatar_stores_sanitized_url() {
    let session = session(MockApi::new());
    let payload = json!({
        "type": "auth-success",
        "token": "t",
        "user": {"id": "1", "name": "A", "avatar_url": "javascript:alert(1)"}
    });
    session.handle_message(POPUP_ORIGIN, &payload);

    let avatar = session.user().and_then(|u| u.avatar_url);
    assert_eq!(avatar.as_deref(), Some("about:blank"));
    let cached: Option<User> = load_json(session.store(), USER_INFO_KEY);
    assert_eq!(cached.and_then(|u| u.avatar_url).as_deref(), Some("about:blank"));
}

#[test]
fn error_message_shows_notice_without_state_change() {
    let session = session(MockApi::new());
    let before = session.state();
    let outcome = session.handle_message(POPUP_ORIGIN, &json!({"type": "auth-error", "error": "access_denied"}));

    assert_eq!(outcome, MessageOutcome::ReportedError);
    assert_eq!(session.state(), before);
    assert_eq!(
        session.effects().notices.borrow()[0],
        Notice::error("Authentication failed: access_denied")
    );
}

#[test]
fn unknown_message_type_is_ignored() {
    let session = session(MockApi::new());
    let outcome = session.handle_message(POPUP_ORIGIN, &json!({"type": "resize", "height": 20}));
    assert_eq!(outcome, MessageOutcome::Ignored);
    assert!(session.effects().notices.borrow().is_empty());
}

// =========================================================================
// complete_callback / cookie name
// =========================================================================

#[tokio::test]
async fn complete_callback_signs_in_and_stores_token() {
    let mut api = MockApi::new().with_me(Err(AuthError::Unauthorized));
    api.callback = Ok(CallbackResponse { token: "jwt".into(), user: User::new("u9", "Nine") });
    let session = session(api);
    session.initialize().await;

    assert_eq!(session.complete_callback("code", Some("state")).await, Ok(()));
    assert_eq!(session.user().map(|u| u.id), Some("u9".to_owned()));
    assert_eq!(session.store().get(TOKEN_KEY).as_deref(), Some("jwt"));
}

#[tokio::test]
async fn complete_callback_failure_leaves_state() {
    let session = session(MockApi::new().with_me(Err(AuthError::Unauthorized)));
    session.initialize().await;
    let before = session.state();

    assert!(session.complete_callback("bad", None).await.is_err());
    assert_eq!(session.state(), before);
    assert_eq!(session.effects().notices.borrow()[0].level, NoticeLevel::Error);
}

#[test]
fn cookie_name_follows_environment() {
    let session = session(MockApi::new());
    assert_eq!(session.cookie_name(), "authjs.session-token");
}
