// Command-line interface definitions and parsing for netsift

use crate::config::CliConfig;
use crate::core::constants::{defaults, modes, output_formats, timeouts};
use crate::core::types::ExtractionMode;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Text file to scan, or `-` for stdin
    pub file: Option<String>,

    // Extraction
    /// What to extract (prompted when omitted on a terminal)
    #[arg(long, value_name = "MODE", value_parser = modes::ALL, help_heading = "Extraction")]
    pub mode: Option<String>,

    /// Probe extracted URLs for liveness
    #[arg(long, conflicts_with = "no_check", help_heading = "Extraction")]
    pub check: bool,

    /// Only extract, never probe
    #[arg(long, help_heading = "Extraction")]
    pub no_check: bool,

    // Core Options
    /// Total request timeout in seconds (default: 10)
    #[arg(
        short = 't',
        long,
        value_name = "SECONDS",
        help_heading = "Core Options"
    )]
    pub timeout: Option<u64>,

    /// Concurrent probes (default: CPU cores)
    #[arg(long, value_name = "COUNT", help_heading = "Core Options")]
    pub concurrency: Option<usize>,

    // Retry
    /// Retries on 500/502/503/504 (default: 3)
    #[arg(long, value_name = "COUNT", help_heading = "Retry")]
    pub retry: Option<u8>,

    /// Backoff base between retries in ms (default: 1000)
    #[arg(long, value_name = "MS", help_heading = "Retry")]
    pub backoff: Option<u64>,

    // Output & Verbosity
    /// File to write the extracted list or probe results to (default: complete.txt)
    #[arg(short = 'o', long, value_name = "PATH", help_heading = "Output & Verbosity")]
    pub output: Option<String>,

    /// Format of probe results (default: text)
    #[arg(long, value_name = "FORMAT", value_parser = output_formats::ALL, help_heading = "Output & Verbosity")]
    pub format: Option<String>,

    /// Suppress terminal output
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    /// Disable progress bars
    #[arg(long, help_heading = "Output & Verbosity")]
    pub no_progress: bool,

    // Network & Security
    /// Custom User-Agent header
    #[arg(long, value_name = "AGENT", help_heading = "Network & Security")]
    pub user_agent: Option<String>,

    /// Verify TLS certificates (off by default)
    #[arg(long, help_heading = "Network & Security")]
    pub verify_tls: bool,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions
    #[command(name = "completion-generate", arg_required_else_help = true)]
    CompletionGenerate {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Cli {
    /// Extraction mode given on the command line, if any.
    pub fn extraction_mode(&self) -> Option<ExtractionMode> {
        self.mode.as_deref().and_then(|mode| mode.parse().ok())
    }

    /// `Some(true)` for `--check`, `Some(false)` for `--no-check`.
    pub fn check_choice(&self) -> Option<bool> {
        if self.check {
            Some(true)
        } else if self.no_check {
            Some(false)
        } else {
            None
        }
    }
}

/// Convert derive-based CLI arguments directly to CliConfig structure
///
/// Range checks happen later in [`Config::validate`](crate::config::Config::validate);
/// only soft warnings are printed here.
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    let mut cli_config = CliConfig::default();

    // Core options
    if let Some(timeout) = cli.timeout {
        if timeout > timeouts::LONG_TIMEOUT_SECONDS {
            eprintln!(
                "Warning: Timeout of {timeout} seconds is quite large. Consider using a smaller value for better user experience."
            );
        }
        cli_config.timeout = Some(timeout);
    }

    if let Some(concurrency) = cli.concurrency {
        if concurrency > 100 && concurrency <= defaults::MAX_CONCURRENCY {
            eprintln!(
                "Warning: Concurrency of {concurrency} is quite high and may overwhelm hosts. Consider using a smaller value."
            );
        }
        cli_config.concurrency = Some(concurrency);
    }

    // Retry
    cli_config.retry_attempts = cli.retry;
    cli_config.backoff_base_ms = cli.backoff;

    // Output & format
    cli_config.quiet = cli.quiet;
    cli_config.verbose = cli.verbose;
    cli_config.no_progress = cli.no_progress;
    cli_config.output_format = cli.format.clone();
    cli_config.output_path = cli.output.clone();

    // Network & security
    cli_config.user_agent = cli.user_agent.clone();
    cli_config.verify_tls = cli.verify_tls;

    // Configuration
    cli_config.config_file = cli.config.clone();
    cli_config.no_config = cli.no_config;

    cli_config
}
