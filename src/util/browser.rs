//! Browser window helpers for the login popup and outbound links.
//!
//! All functions are inert outside the `hydrate` build.

/// Window features for the login popup.
pub const LOGIN_POPUP_FEATURES: &str = "width=600,height=700";
const LOGIN_POPUP_NAME: &str = "auth-login";

/// Open `url` in a login popup, falling back to a full-page redirect when
/// the browser blocks the popup.
pub fn open_login_window(url: &str) {
    #[cfg(feature = "hydrate")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        match window.open_with_url_and_target_and_features(url, LOGIN_POPUP_NAME, LOGIN_POPUP_FEATURES) {
            Ok(Some(_)) => {}
            _ => {
                tracing::info!("login popup blocked; redirecting");
                let _ = window.location().set_href(url);
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (url, LOGIN_POPUP_NAME);
    }
}

/// Open `url` in a new browsing context.
pub fn open_in_new_context(url: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.open_with_url_and_target(url, "_blank");
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = url;
    }
}

/// Origin of the current page, e.g. `https://studio.example.com`.
pub fn page_origin() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window().and_then(|w| w.location().origin().ok())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Convert a `MessageEvent` payload into JSON. Non-serializable data reads as `Null`.
#[cfg(feature = "hydrate")]
pub fn message_data(ev: &web_sys::MessageEvent) -> serde_json::Value {
    js_sys::JSON::stringify(&ev.data())
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or(serde_json::Value::Null)
}

