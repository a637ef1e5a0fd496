//! netsift: pull IPv4 addresses and URLs out of free-form text and check
//! whether the URLs are alive.
//!
//! Extraction is synchronous and pure; liveness checking runs on tokio with
//! bounded concurrency, retries on transient 5xx responses and reports
//! progress through a callback.

pub mod config;
pub mod core;
pub mod discovery;
pub mod reporting;
pub mod ui;
pub mod validation;

pub use crate::config::{CliConfig, Config};
pub use crate::core::{
    Candidate, ExtractionMode, NetSiftError, ProbeResult, ProbeStatus, Result,
};
pub use crate::discovery::{
    ExtractCandidates, Extractor, InputSource, extract_ips, extract_urls, read_input,
};
pub use crate::validation::{
    BatchHandle, BatchRunner, BatchSummary, LivenessChecker, Probe, RetryPolicy,
};
