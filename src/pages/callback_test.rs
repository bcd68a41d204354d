use super::*;

#[test]
fn callback_params_requires_code() {
    assert_eq!(callback_params(None, Some("s".to_owned())), None);
    assert_eq!(callback_params(Some("  ".to_owned()), None), None);
}

#[test]
fn callback_params_keeps_state_when_present() {
    assert_eq!(
        callback_params(Some("abc".to_owned()), Some("xyz".to_owned())),
        Some(("abc".to_owned(), Some("xyz".to_owned())))
    );
}

#[test]
fn callback_params_drops_empty_state() {
    assert_eq!(callback_params(Some("abc".to_owned()), Some(String::new())), Some(("abc".to_owned(), None)));
}
