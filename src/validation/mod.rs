//! Liveness checking
//!
//! HTTP probing with retry and backoff, page title extraction, and a
//! concurrent batch runner with progress reporting.

pub mod batch;
pub mod checker;
pub mod page;

// Re-export commonly used items
pub use batch::{BatchHandle, BatchRunner, BatchSummary};
pub use checker::{LivenessChecker, Probe, RetryPolicy, normalize_url};
