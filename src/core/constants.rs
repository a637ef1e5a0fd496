/// Application-wide constants to avoid magic values throughout the codebase.
///
/// This module centralizes all magic strings, numbers, and other literal values
/// used across the application, making them easier to maintain and modify.
/// Output format constants
pub mod output_formats {
    /// Text output format - aligned table with a header row
    pub const TEXT: &str = "text";
    /// JSON output format - structured output for automation
    pub const JSON: &str = "json";
    /// Minimal output format - tab separated, no header
    pub const MINIMAL: &str = "minimal";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 3] = [TEXT, JSON, MINIMAL];
}

/// Extraction mode names as accepted on the command line
pub mod modes {
    pub const IP: &str = "ip";
    pub const URL: &str = "url";

    pub const ALL: [&str; 2] = [IP, URL];
}

/// HTTP status code constants
pub mod http_status {
    /// HTTP 200 OK - successful response
    pub const OK: u16 = 200;
    /// HTTP 500 Internal Server Error - server error
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
    /// HTTP 502 Bad Gateway - bad gateway error
    pub const BAD_GATEWAY: u16 = 502;
    /// HTTP 503 Service Unavailable
    pub const SERVICE_UNAVAILABLE: u16 = 503;
    /// HTTP 504 Gateway Timeout
    pub const GATEWAY_TIMEOUT: u16 = 504;

    /// Status codes that trigger a retry by default
    pub const RETRYABLE: [u16; 4] = [
        INTERNAL_SERVER_ERROR,
        BAD_GATEWAY,
        SERVICE_UNAVAILABLE,
        GATEWAY_TIMEOUT,
    ];
}

/// Timeout and duration constants
pub mod timeouts {
    /// Default total request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
    /// Maximum accepted timeout in seconds (24 hours)
    pub const MAX_TIMEOUT_SECONDS: u64 = 86400;
    /// Timeouts above this get a warning on the command line
    pub const LONG_TIMEOUT_SECONDS: u64 = 300;
    /// Default backoff base in milliseconds
    pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1000;
    /// Upper bound for a single backoff sleep in milliseconds
    pub const MAX_BACKOFF_MS: u64 = 120_000;
}

/// Default configuration values
pub mod defaults {
    /// Default number of retries on a retryable status
    pub const RETRY_ATTEMPTS: u8 = 3;
    /// Hard ceiling for configured retries
    pub const MAX_RETRY_ATTEMPTS: u8 = 20;
    /// Hard ceiling for configured concurrency
    pub const MAX_CONCURRENCY: usize = 1000;
    /// Default column width used to wrap titles
    pub const TITLE_WRAP_WIDTH: usize = 80;
    /// Narrowest wrap width accepted from configuration
    pub const MIN_TITLE_WRAP_WIDTH: usize = 20;
    /// Default file the extracted list or probe results are written to
    pub const OUTPUT_FILE: &str = "complete.txt";
    /// Config file looked up in the current and parent directories
    pub const CONFIG_FILE: &str = ".netsift.toml";
    /// Browser-like User-Agent sent with every probe
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
}

/// Extraction constants
pub mod extraction {
    /// How many characters after a bare IP are searched for a port label
    pub const PORT_LOOKAHEAD_CHARS: usize = 20;
    /// Top-level domains recognised for bare domains
    pub const DOMAIN_TLDS: [&str; 8] = ["com", "net", "org", "cn", "cc", "io", "gov", "edu"];
    /// Characters stripped from the end of every extracted string
    pub const TRAILING_NOISE: [char; 4] = ['}', '"', '，', ','];
}

/// Probe result placeholders
pub mod probe {
    /// Title recorded when a page has no usable <title>
    pub const NULL_TITLE: &str = "null";
    /// Status label recorded when a probe failed at the network level
    pub const ERROR_STATUS: &str = "Error";
    /// Bytes of body inspected for a <meta charset> declaration
    pub const CHARSET_SNIFF_BYTES: usize = 1024;
}

/// Display and formatting constants
pub mod display {
    /// Emoji for success status
    pub const SUCCESS_EMOJI: &str = "✅";
    /// Emoji for warning status
    pub const WARNING_EMOJI: &str = "⚠️";
    /// Emoji for network/connection errors
    pub const NETWORK_ERROR_EMOJI: &str = "🔌";
    /// Emoji for file information
    pub const FILE_EMOJI: &str = "📁";
}
