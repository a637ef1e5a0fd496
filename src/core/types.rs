use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::core::constants::{http_status, modes, probe};

/// What an extraction pass should look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// Plain IPv4 addresses
    Ip,
    /// URLs, including ones synthesized from bare IPs and domains
    #[default]
    Url,
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip => write!(f, "{}", modes::IP),
            Self::Url => write!(f, "{}", modes::URL),
        }
    }
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            modes::IP => Ok(Self::Ip),
            modes::URL => Ok(Self::Url),
            other => Err(format!(
                "Unknown mode '{other}'. Expected one of: {}.",
                modes::ALL.join(", ")
            )),
        }
    }
}

/// A single extracted identifier in its normalized string form.
///
/// Equality and hashing are over the normalized string only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    value: String,
}

impl Candidate {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Outcome of a liveness probe: the final HTTP status or a network-level error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Code(u16),
    Error,
}

impl ProbeStatus {
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Code(code) => Some(*code),
            Self::Error => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Error => f.write_str(probe::ERROR_STATUS),
        }
    }
}

impl Serialize for ProbeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Code(code) => serializer.serialize_u16(*code),
            Self::Error => serializer.serialize_str(probe::ERROR_STATUS),
        }
    }
}

/// One row of a batch run: the probed URL, its status and its page title.
///
/// Field order matches the result table columns: URL, Status Code, Title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub url: String,
    #[serde(rename = "status_code")]
    pub status: ProbeStatus,
    pub title: String,
}

impl ProbeResult {
    /// Create a result for a URL that answered with an HTTP status.
    pub fn success(url: String, status_code: u16, title: String) -> Self {
        Self {
            url,
            status: ProbeStatus::Code(status_code),
            title,
        }
    }

    /// Create a result for a URL that could not be reached at all.
    pub fn error(url: String, description: String) -> Self {
        Self {
            url,
            status: ProbeStatus::Error,
            title: description,
        }
    }

    /// Reachable and answered with a 2xx status.
    pub fn is_ok(&self) -> bool {
        matches!(self.status, ProbeStatus::Code(code) if (http_status::OK..300).contains(&code))
    }

    pub fn is_error(&self) -> bool {
        self.status.is_error()
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.status, self.url, self.title)
    }
}
