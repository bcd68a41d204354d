//! Utility helpers shared across the auth layer.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from session and page
//! logic so the session lifecycle stays testable off the browser.

pub mod auth;
pub mod browser;
pub mod dark_mode;
pub mod security;
pub mod storage;
