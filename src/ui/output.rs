//! Output sink and terminal display for netsift

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::config::Config;
use crate::core::constants::{display, output_formats};
use crate::core::error::{NetSiftError, Result};
use crate::core::types::{ExtractionMode, ProbeResult};
use crate::ui::color::{Colors, colorize, paint_status};
use crate::validation::BatchSummary;

const HEADER_URL: &str = "URL";
const HEADER_STATUS: &str = "Status Code";
const HEADER_TITLE: &str = "Title";
const COLUMN_GAP: &str = "  ";

#[derive(Serialize)]
struct ResultsDocument<'a> {
    generated_at: String,
    results: &'a [ProbeResult],
}

/// `path` if nothing exists there, otherwise the first free `stem_N.ext`.
pub fn unique_output_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    (1..)
        .map(|n| {
            let name = match extension {
                Some(ref ext) => format!("{stem}_{n}.{ext}"),
                None => format!("{stem}_{n}"),
            };
            path.with_file_name(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Write one extracted item per line.
pub fn write_items(path: &Path, items: &[String]) -> Result<()> {
    let mut file = fs::File::create(path)?;
    for item in items {
        writeln!(file, "{item}")?;
    }
    Ok(())
}

/// Write probe results to `path` in `format` (`text`, `json` or `minimal`).
pub fn write_results(path: &Path, results: &[ProbeResult], format: &str) -> Result<()> {
    let rendered = render_results(results, format)?;
    fs::write(path, rendered)?;
    Ok(())
}

pub fn render_results(results: &[ProbeResult], format: &str) -> Result<String> {
    match format {
        output_formats::TEXT => Ok(render_table(results)),
        output_formats::JSON => render_json(results),
        output_formats::MINIMAL => Ok(render_minimal(results)),
        other => Err(NetSiftError::InvalidArgument(format!(
            "Unknown output format '{other}'. Expected one of: {}",
            output_formats::ALL.join(", ")
        ))),
    }
}

/// Aligned table; wrapped titles continue under the title column.
fn render_table(results: &[ProbeResult]) -> String {
    let url_width = results
        .iter()
        .map(|r| r.url.chars().count())
        .chain([HEADER_URL.len()])
        .max()
        .unwrap_or(0);
    let status_width = results
        .iter()
        .map(|r| r.status.to_string().len())
        .chain([HEADER_STATUS.len()])
        .max()
        .unwrap_or(0);
    let title_indent = " ".repeat(url_width + status_width + 2 * COLUMN_GAP.len());

    let mut out = format!(
        "{HEADER_URL:<url_width$}{COLUMN_GAP}{HEADER_STATUS:<status_width$}{COLUMN_GAP}{HEADER_TITLE}\n"
    );

    for result in results {
        let mut title_lines = result.title.lines();
        let first = title_lines.next().unwrap_or("");
        let status = result.status.to_string();

        let row = format!(
            "{:<url_width$}{COLUMN_GAP}{status:<status_width$}{COLUMN_GAP}{first}",
            result.url
        );
        out.push_str(row.trim_end());
        out.push('\n');

        for line in title_lines {
            out.push_str(&title_indent);
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}

fn render_json(results: &[ProbeResult]) -> Result<String> {
    let document = ResultsDocument {
        generated_at: Utc::now().to_rfc3339(),
        results,
    };
    Ok(serde_json::to_string_pretty(&document)? + "\n")
}

/// Tab separated `url  status  title`, one row per line.
fn render_minimal(results: &[ProbeResult]) -> String {
    results
        .iter()
        .map(|r| {
            let title = r.title.split_whitespace().collect::<Vec<_>>().join(" ");
            format!("{}\t{}\t{}\n", r.url, r.status, title)
        })
        .collect()
}

/// Display configuration information in a user-friendly format
pub fn display_config_info(config: &Config, concurrency: usize) {
    let rows = [
        ("Using concurrency", concurrency.to_string()),
        (
            "Using timeout (seconds)",
            config.timeout_duration().as_secs().to_string(),
        ),
        (
            "Retry attempts",
            config.retry_attempts.unwrap_or_default().to_string(),
        ),
        (
            "Backoff base (ms)",
            config.backoff_base_duration().as_millis().to_string(),
        ),
        (
            "Verify TLS",
            config.verify_tls.unwrap_or(false).to_string(),
        ),
    ];

    for (label, value) in rows {
        println!(
            "{}: {}",
            colorize(label, Colors::CYAN),
            colorize(&value, Colors::BOLD)
        );
    }
    println!();
}

/// Display the extracted items as a numbered list
pub fn display_extraction(mode: ExtractionMode, items: &[String]) {
    println!(
        "\n{} {}",
        colorize("🔍", Colors::BRIGHT_GREEN),
        colorize(
            &format!("Found {} unique {mode} identifier(s)", items.len()),
            Colors::BOLD
        )
    );

    for (i, item) in items.iter().enumerate() {
        println!(
            "   {}. {}",
            colorize(&format!("{}", i + 1), Colors::DIM),
            colorize(item, Colors::CYAN)
        );
    }
    println!();
}

/// Display each probe result followed by a one-line summary
pub fn display_probe_results(results: &[ProbeResult], summary: &BatchSummary) {
    for result in results {
        let title = result.title.split_whitespace().collect::<Vec<_>>().join(" ");
        println!(
            "   {} {} {}",
            paint_status(result.status),
            result.url,
            colorize(&title, Colors::DIM)
        );
    }

    if summary.errors == 0 {
        println!(
            "\n{} {}",
            display::SUCCESS_EMOJI,
            colorize(
                &format!("All {} URL(s) reachable", summary.total),
                Colors::BRIGHT_GREEN
            )
        );
    } else {
        println!(
            "\n{} {}",
            display::NETWORK_ERROR_EMOJI,
            colorize(
                &format!(
                    "{}/{} URL(s) reachable, {} unreachable",
                    summary.reachable, summary.total, summary.errors
                ),
                Colors::YELLOW
            )
        );
    }
}

pub fn display_saved(path: &Path, rows: usize) {
    println!(
        "{} Wrote {rows} row(s) to {}",
        display::FILE_EMOJI,
        colorize(&path.display().to_string(), Colors::BOLD)
    );
}

pub fn display_nothing_to_do(message: &str) {
    println!("{} {message}", display::WARNING_EMOJI);
}
