use crate::config::Config;
use crate::core::types::{ExtractionMode, ProbeStatus};
use log::{debug, error, info, warn};

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Off // Only show structured logs in verbose mode
    };

    // try_init: a second initialization (tests, embedding) is not an error
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .try_init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log configuration information
pub fn log_config_info(config: &Config, concurrency: usize) {
    let timeout = config.timeout.unwrap_or(10);
    let retry_attempts = config.retry_attempts.unwrap_or(0);
    let backoff = config.backoff_base_ms.unwrap_or(1000);
    let verify_tls = config.verify_tls.unwrap_or(false);

    info!("Configuration: concurrency={concurrency}, timeout={timeout}s");
    info!(
        "Retry: attempts={retry_attempts}, backoff_base={backoff}ms, statuses={:?}",
        config.retry_status_codes.as_deref().unwrap_or_default()
    );
    info!("HTTP: verify_tls={verify_tls}");
}

/// Log extraction results
pub fn log_extraction(mode: ExtractionMode, found: usize, source: &str) {
    info!("Extracted {found} unique {mode} identifier(s) from {source}");
}

/// Log batch start
pub fn log_batch_start(url_count: usize, concurrency: usize) {
    info!("Starting liveness check of {url_count} URL(s) with concurrency {concurrency}");
}

/// Log batch completion
pub fn log_batch_complete(total: usize, reachable: usize, errors: usize, duration_ms: u128) {
    if errors == 0 {
        info!("✅ Liveness check complete: {reachable}/{total} URLs reachable ({duration_ms}ms)");
    } else {
        warn!(
            "❌ Liveness check complete: {reachable}/{total} URLs reachable, {errors} unreachable ({duration_ms}ms)"
        );
    }
}

/// Log a retry decision for a retryable status
pub fn log_retry(url: &str, status: u16, retry: u32, delay_ms: u128) {
    debug!("↻ {url} -> {status}, retry #{retry} in {delay_ms}ms");
}

/// Log individual probe results for debugging
pub fn log_probe_result(url: &str, status: ProbeStatus, title: &str) {
    match status {
        ProbeStatus::Code(code) => debug!("✓ {url} -> {code} ({title})"),
        ProbeStatus::Error => debug!("✗ {url} -> {title}"),
    }
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}

/// Log warning information
pub fn log_warning(message: &str) {
    warn!("{message}");
}
