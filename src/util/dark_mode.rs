//! Dark mode preference, persistence, and document class toggle.
//!
//! The preference is stored as `"light"` or `"dark"` under
//! [`DARK_MODE_KEY`]; anything else reads as light. [`apply`] sets the
//! `.dark-mode` class on `<html>` and requires a browser environment.

#[cfg(test)]
#[path = "dark_mode_test.rs"]
mod dark_mode_test;

use serde::{Deserialize, Serialize};

use super::storage::{DARK_MODE_KEY, KeyValueStore};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DarkMode {
    #[default]
    Light,
    Dark,
}

impl DarkMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("dark") { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Read the stored preference, defaulting to light.
pub fn read_preference(store: &impl KeyValueStore) -> DarkMode {
    store.get(DARK_MODE_KEY).map_or(DarkMode::Light, |raw| DarkMode::parse(&raw))
}

/// Persist `mode` and apply it to the document.
pub fn set_preference(store: &impl KeyValueStore, mode: DarkMode) {
    store.set(DARK_MODE_KEY, mode.as_str());
    apply(mode);
}

/// Apply or remove the `.dark-mode` class on the `<html>` element.
pub fn apply(mode: DarkMode) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.document_element())
        {
            let class_list = el.class_list();
            if mode.is_dark() {
                let _ = class_list.add_1("dark-mode");
            } else {
                let _ = class_list.remove_1("dark-mode");
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = mode;
    }
}
