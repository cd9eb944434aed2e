//! segs-health — TCP liveness probes for a SEGS server.
//!
//! Two probes run back to back against the same host: the auth port
//! (connect, read) and the JSON-RPC port (connect, write a bare ping,
//! read). A probe is alive when it reads at least one byte before the
//! timeout; the response itself is never parsed.
//!
//! # Architecture
//!
//! ```text
//! LivenessChecker
//!   ├── check_connection(auth) → ProbeResult
//!   ├── check_connection(rpc)  → ProbeResult
//!   └── LivenessReport { auth, rpc }
//!         └── needs_restart() = !auth.is_alive() || !rpc.is_alive()
//! ```
//!
//! Failures are values, not errors: every connect, write or read failure
//! collapses into a non-alive [`ProbeResult`] variant, and the variants
//! are only reduced to a boolean by [`LivenessReport::needs_restart`].

pub mod checker;
pub mod liveness;

pub use checker::{ProbeResult, ProbeTarget, check_connection};
pub use liveness::{LivenessChecker, LivenessReport};
