use super::*;
use crate::error::AuthError;
use crate::net::types::{AuthType, AuthTypeResponse, User};

fn loaded(kind: &str, user: Result<User, AuthError>) -> AuthState {
    let mut state = AuthState::default();
    state.begin_load();
    state.finish_load(AuthTypeResponse { kind: AuthType::new(kind), exclude_paths: Vec::new() }, user);
    state
}

#[test]
fn login_redirect_waits_while_loading() {
    let mut state = AuthState::default();
    assert_eq!(login_redirect(&state), None);
    state.begin_load();
    assert_eq!(login_redirect(&state), None);
}

#[test]
fn login_redirect_skips_login_when_auth_disabled() {
    assert_eq!(login_redirect(&loaded("none", Err(AuthError::Unauthorized))), Some("/"));
}

#[test]
fn login_redirect_sends_signed_in_users_home() {
    assert_eq!(login_redirect(&loaded("takin", Ok(User::new("u1", "Alice")))), Some("/"));
}

#[test]
fn login_redirect_stays_for_anonymous_users() {
    assert_eq!(login_redirect(&loaded("takin", Err(AuthError::Unauthorized))), None);
}
