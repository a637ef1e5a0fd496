use crate::core::error::{NetSiftError, Result};

use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Marker accepted in place of a path to read from standard input.
pub const STDIN_MARKER: &str = "-";

/// Where raw text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(String),
}

impl InputSource {
    pub fn from_arg(arg: &str) -> Self {
        if arg == STDIN_MARKER {
            Self::Stdin
        } else {
            Self::File(arg.to_string())
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::File(path) => path.clone(),
        }
    }
}

/// Read the whole input as UTF-8 text.
///
/// A missing file is reported as an invalid argument so the caller can show
/// it to the user rather than as a raw IO failure.
pub fn read_input(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
        InputSource::File(path) => read_text_file(Path::new(path)),
    }
}

fn read_text_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(NetSiftError::InvalidArgument(format!(
            "File not found: '{}'",
            path.display()
        )));
    }
    if path.is_dir() {
        return Err(NetSiftError::InvalidArgument(format!(
            "Expected a file but got a directory: '{}'",
            path.display()
        )));
    }

    fs::read_to_string(path).map_err(|e| {
        NetSiftError::Io(io::Error::new(
            e.kind(),
            format!("Could not read '{}': {e}", path.display()),
        ))
    })
}
