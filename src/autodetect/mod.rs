//! Allowed-method autodetection.
//!
//! # Data Flow
//! ```text
//! endpoint definition + project base URL
//!     → client.rs (OPTIONS request with timeout)
//!     → Allow header ("GET, HEAD, OPTIONS")
//!     → parsed method list
//!     → catalog::apply_detected_methods (overwrite flags)
//! ```
//!
//! On any failure (network, timeout, non-2xx, missing header) the endpoint's
//! method flags are left untouched and the error is surfaced to the caller.

pub mod client;

pub use client::{parse_allow, AutodetectClient, AutodetectError, AutodetectResult};
