//! segs-watchdog — one check-then-restart pass over a SEGS server.
//!
//! Intended to be run from cron or Task Scheduler. Each invocation probes
//! the auth and JSON-RPC ports once and, if either is silent, restarts the
//! service. Nothing is remembered between runs.

pub mod watchdog;

pub use watchdog::{Watchdog, WatchdogRun, load_config};
