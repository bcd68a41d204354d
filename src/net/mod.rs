//! Auth backend transports, wire types, and popup message decoding.

pub mod api;
pub mod browser;
#[cfg(not(target_arch = "wasm32"))]
pub mod http;
pub mod message;
pub mod types;
