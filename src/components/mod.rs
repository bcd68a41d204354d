//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render auth chrome and read shared state from the
//! [`crate::state::app::AppContext`] provider.

pub mod credits_modal;
pub mod notice_stack;
