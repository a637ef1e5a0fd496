//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::constants::{defaults, http_status, output_formats, timeouts};
use crate::core::error::{NetSiftError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Total timeout in seconds for a single HTTP request
    pub timeout: Option<u64>,

    /// Number of probes allowed in flight at once
    pub concurrency: Option<usize>,

    /// Retries on a retryable status code
    pub retry_attempts: Option<u8>,

    /// Backoff base in milliseconds
    pub backoff_base_ms: Option<u64>,

    /// HTTP status codes that trigger a retry
    pub retry_status_codes: Option<Vec<u16>>,

    /// User-Agent header sent with every probe
    pub user_agent: Option<String>,

    /// Verify TLS certificates (off by default: reachability over validity)
    pub verify_tls: Option<bool>,

    /// Column width titles are wrapped at
    pub title_wrap_width: Option<usize>,

    /// Output format (text, json, minimal)
    pub output_format: Option<String>,

    /// Where results are written
    pub output_path: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Some(timeouts::DEFAULT_TIMEOUT_SECONDS),
            concurrency: None, // Will default to CPU core count
            retry_attempts: Some(defaults::RETRY_ATTEMPTS),
            backoff_base_ms: Some(timeouts::DEFAULT_BACKOFF_BASE_MS),
            retry_status_codes: Some(http_status::RETRYABLE.to_vec()),
            user_agent: None,
            verify_tls: Some(false),
            title_wrap_width: Some(defaults::TITLE_WRAP_WIDTH),
            output_format: Some(output_formats::DEFAULT.to_string()),
            output_path: None,
            verbose: Some(false),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults for missing keys
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            NetSiftError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            NetSiftError::Config(format!(
                "Invalid TOML in config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config.with_defaults())
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        if let Ok(config) = Self::load_from_file(defaults::CONFIG_FILE) {
            return config;
        }

        // Parent directories, up to 3 levels
        for i in 1..=3 {
            let path = format!("{}{}", "../".repeat(i), defaults::CONFIG_FILE);
            if let Ok(config) = Self::load_from_file(&path) {
                return config;
            }
        }

        Self::default()
    }

    /// Fill keys a config file left out with their defaults
    fn with_defaults(self) -> Self {
        let fallback = Self::default();
        Self {
            timeout: self.timeout.or(fallback.timeout),
            concurrency: self.concurrency.or(fallback.concurrency),
            retry_attempts: self.retry_attempts.or(fallback.retry_attempts),
            backoff_base_ms: self.backoff_base_ms.or(fallback.backoff_base_ms),
            retry_status_codes: self.retry_status_codes.or(fallback.retry_status_codes),
            user_agent: self.user_agent.or(fallback.user_agent),
            verify_tls: self.verify_tls.or(fallback.verify_tls),
            title_wrap_width: self.title_wrap_width.or(fallback.title_wrap_width),
            output_format: self.output_format.or(fallback.output_format),
            output_path: self.output_path.or(fallback.output_path),
            verbose: self.verbose.or(fallback.verbose),
        }
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        // Network
        if let Some(timeout) = cli_config.timeout {
            self.timeout = Some(timeout);
        }
        if let Some(ref user_agent) = cli_config.user_agent {
            self.user_agent = Some(user_agent.clone());
        }
        if cli_config.verify_tls {
            self.verify_tls = Some(true);
        }

        // Performance & retry
        if let Some(concurrency) = cli_config.concurrency {
            self.concurrency = Some(concurrency);
        }
        if let Some(retry_attempts) = cli_config.retry_attempts {
            self.retry_attempts = Some(retry_attempts);
        }
        if let Some(backoff) = cli_config.backoff_base_ms {
            self.backoff_base_ms = Some(backoff);
        }

        // Output & format
        if cli_config.verbose {
            self.verbose = Some(true);
        }
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }
        if let Some(ref output_path) = cli_config.output_path {
            self.output_path = Some(output_path.clone());
        }
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(timeouts::DEFAULT_TIMEOUT_SECONDS))
    }

    /// Get backoff base as Duration
    pub fn backoff_base_duration(&self) -> Duration {
        Duration::from_millis(
            self.backoff_base_ms
                .unwrap_or(timeouts::DEFAULT_BACKOFF_BASE_MS),
        )
    }

    /// Concurrency to use, defaulting to the number of CPU cores
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn effective_user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(defaults::USER_AGENT)
    }

    pub fn effective_output_format(&self) -> &str {
        self.output_format
            .as_deref()
            .unwrap_or(output_formats::DEFAULT)
    }

    pub fn effective_output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(defaults::OUTPUT_FILE)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err(NetSiftError::Config(
                    "Timeout cannot be 0. Expected a positive integer representing seconds."
                        .to_string(),
                ));
            }
            if timeout > timeouts::MAX_TIMEOUT_SECONDS {
                return Err(NetSiftError::Config(format!(
                    "Timeout of {timeout} seconds is extremely large (>24 hours). Consider using a smaller value."
                )));
            }
        }

        if let Some(concurrency) = self.concurrency {
            if concurrency == 0 {
                return Err(NetSiftError::Config(
                    "Concurrency cannot be 0. Expected a positive integer.".to_string(),
                ));
            }
            if concurrency > defaults::MAX_CONCURRENCY {
                return Err(NetSiftError::Config(format!(
                    "Concurrency of {concurrency} is extremely high and may cause system instability. Consider using a smaller value."
                )));
            }
        }

        if let Some(retry) = self.retry_attempts
            && retry > defaults::MAX_RETRY_ATTEMPTS
        {
            return Err(NetSiftError::Config(format!(
                "Retry attempts of {retry} is very high and may cause long delays. Consider using a smaller value."
            )));
        }

        if let Some(ref codes) = self.retry_status_codes {
            for &code in codes {
                if !(100..=599).contains(&code) {
                    return Err(NetSiftError::Config(format!(
                        "Status code {code} is not a valid HTTP status code. Expected a number between 100-599."
                    )));
                }
            }
        }

        if let Some(width) = self.title_wrap_width
            && width < defaults::MIN_TITLE_WRAP_WIDTH
        {
            return Err(NetSiftError::Config(format!(
                "Title wrap width of {width} is too narrow. Expected at least {}.",
                defaults::MIN_TITLE_WRAP_WIDTH
            )));
        }

        if let Some(ref format) = self.output_format
            && !output_formats::ALL.contains(&format.as_str())
        {
            return Err(NetSiftError::Config(format!(
                "Invalid output format '{format}'. Expected one of: {}.",
                output_formats::ALL.join(", ")
            )));
        }

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    // Network
    pub timeout: Option<u64>,        // --timeout
    pub user_agent: Option<String>,  // --user-agent
    pub verify_tls: bool,            // --verify-tls

    // Performance & retry
    pub concurrency: Option<usize>,     // --concurrency
    pub retry_attempts: Option<u8>,     // --retry
    pub backoff_base_ms: Option<u64>,   // --backoff

    // Output & format
    pub quiet: bool,                   // --quiet
    pub verbose: bool,                 // --verbose
    pub output_format: Option<String>, // --format
    pub output_path: Option<String>,   // --output
    pub no_progress: bool,             // --no-progress

    // Configuration
    pub config_file: Option<String>, // --config
    pub no_config: bool,             // --no-config
}
