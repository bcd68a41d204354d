//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `auth` is the framework-free session value, `session` drives it against
//! the backend, `notices` holds toasts, and `app` bundles the signals the
//! UI reads through context.

pub mod app;
pub mod auth;
pub mod notices;
pub mod session;
