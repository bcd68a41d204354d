//! Validation and sanitization for values that cross a trust boundary.
//!
//! SYSTEM CONTEXT
//! ==============
//! Popup messages can be posted by any window, and user records carry URLs
//! that end up in `src`/`href` attributes. Everything in this module is a
//! pure function so the handshake policy can be tested without a browser.

#[cfg(test)]
#[path = "security_test.rs"]
mod security_test;

use std::collections::BTreeSet;

use serde_json::Value;
use url::Url;

/// Replacement for URLs that fail sanitization.
pub const BLANK_URL: &str = "about:blank";

/// Default in-app redirect target.
pub const HOME_ROUTE: &str = "/";

const RELATIVE_BASE: &str = "http://relative.invalid";
const CREDIT_FIELDS: [&str; 3] = ["subscriptionCredits", "subscriptionPurchasedCredits", "extraCredits"];
const OPTIONAL_STRING_FIELDS: [&str; 3] = ["email", "avatar_url", "provider"];

/// Reduce an absolute URL to its `scheme://host[:port]` origin.
///
/// Returns `None` for relative URLs and opaque origins (`data:`, `file:`, `null`).
#[must_use]
pub fn normalize_origin(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let origin = url.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Whether a message origin is on the allow-list.
#[must_use]
pub fn is_trusted_origin(origin: &str, trusted: &BTreeSet<String>) -> bool {
    normalize_origin(origin).is_some_and(|normalized| trusted.contains(&normalized))
}

/// Neutralize URLs that could execute script or smuggle markup.
///
/// Root-relative paths and `http`/`https` URLs pass through (re-serialized,
/// so quotes and angle brackets come back percent-encoded). Everything else
/// becomes [`BLANK_URL`].
#[must_use]
pub fn sanitize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_control) {
        return BLANK_URL.to_owned();
    }
    if is_root_relative(trimmed) {
        return sanitize_relative(trimmed).unwrap_or_else(|| BLANK_URL.to_owned());
    }
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url.to_string(),
        _ => BLANK_URL.to_owned(),
    }
}

/// Restrict post-login navigation to same-site paths.
///
/// Absolute URLs, protocol-relative `//host` forms, and backslash tricks all
/// collapse to [`HOME_ROUTE`].
#[must_use]
pub fn sanitize_redirect_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_root_relative(trimmed) && !trimmed.chars().any(char::is_control) {
        trimmed.to_owned()
    } else {
        HOME_ROUTE.to_owned()
    }
}

/// Shape check for a user record received over `postMessage`.
///
/// `id` and `name` must be non-empty strings; optional fields, when present
/// and non-null, must have their declared types.
#[must_use]
pub fn is_valid_user_object(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let non_empty = |key: &str| obj.get(key).and_then(Value::as_str).is_some_and(|s| !s.trim().is_empty());
    if !non_empty("id") || !non_empty("name") {
        return false;
    }

    let optional = |key: &str, check: fn(&Value) -> bool| obj.get(key).is_none_or(|v| v.is_null() || check(v));
    OPTIONAL_STRING_FIELDS.iter().all(|key| optional(*key, Value::is_string))
        && CREDIT_FIELDS.iter().all(|key| optional(*key, Value::is_number))
        && optional("roles", |v| v.as_array().is_some_and(|roles| roles.iter().all(Value::is_string)))
}

/// Re-serialize a root-relative path through a placeholder origin so it gets
/// the same percent-encoding as absolute URLs.
fn sanitize_relative(path: &str) -> Option<String> {
    let base = Url::parse(RELATIVE_BASE).ok()?;
    let url = base.join(path).ok()?;
    if url.origin() != base.origin() {
        return None;
    }
    let mut out = url.path().to_owned();
    if let Some(query) = url.query() {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        out.push('#');
        out.push_str(fragment);
    }
    Some(out)
}

fn is_root_relative(value: &str) -> bool {
    value.starts_with('/') && !value.starts_with("//") && !value.contains('\\')
}
