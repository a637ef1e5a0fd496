//! Identifier discovery
//!
//! This module reads raw text and extracts IPv4 addresses and URLs
//! from it.

pub mod extractor;
pub mod input;

// Re-export commonly used items
pub use extractor::{ExtractCandidates, Extractor, extract_ips, extract_urls};
pub use input::{InputSource, read_input};
