//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Timers between solver attempts
//! - Logging setup
//! - The JS-facing solver handle (web only)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Initialise logging for native hosts
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    // try_init so tests and embedding hosts can call this more than once
    let _ = env_logger::builder().is_test(cfg!(test)).try_init();
}
