use super::*;

#[test]
fn unauthorized_reports_401() {
    assert_eq!(AuthError::Unauthorized.http_status(), Some(401));
}

#[test]
fn transport_errors_have_no_status() {
    let err = AuthError::transport("connection refused");
    assert_eq!(err.http_status(), None);
    assert_eq!(err.to_string(), "request failed: connection refused");
}

#[test]
fn status_errors_keep_status() {
    let err = AuthError::status(503, "service unavailable");
    assert_eq!(err.http_status(), Some(503));
}

#[test]
fn config_error_messages_name_the_value() {
    assert_eq!(ConfigError::UnknownEnvironment("qa".into()).to_string(), "unknown AUTH_ENV: qa");
}
