use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::validation::BatchSummary;

/// Terminal progress bar for a probe batch.
///
/// A disabled reporter turns every call into a no-op, so callers never need
/// to branch on `--quiet` or `--no-progress`.
pub struct ProgressReporter {
    probe_progress: Option<ProgressBar>,
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self {
            probe_progress: None,
            enabled,
        }
    }

    pub fn start_probing(&mut self, total_urls: usize) {
        if !self.enabled {
            return;
        }

        let pb = ProgressBar::new(total_urls as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.yellow/red}] {pos}/{len} URLs probed ({eta})")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb.set_message("Probing URLs");
        pb.enable_steady_tick(Duration::from_millis(120));
        self.probe_progress = Some(pb);
    }

    /// A progress callback for [`BatchRunner`](crate::validation::BatchRunner)
    /// that drives this reporter's bar from any thread.
    pub fn callback(&self) -> impl FnMut(usize, usize) + Send + 'static {
        let pb = self.probe_progress.clone();
        move |completed, total| {
            if let Some(ref pb) = pb {
                pb.set_length(total as u64);
                pb.set_position(completed as u64);
            }
        }
    }

    pub fn finish_probing(&self, summary: &BatchSummary) {
        if let Some(ref pb) = self.probe_progress {
            let message = if summary.errors == 0 {
                "✓ All URLs reachable".to_string()
            } else {
                format!(
                    "✓ Probing complete ({}/{} reachable)",
                    summary.reachable, summary.total
                )
            };
            pb.finish_with_message(message);
        }
    }

    pub fn finish_and_clear(&self) {
        if let Some(ref pb) = self.probe_progress {
            pb.finish_and_clear();
        }
    }

    /// Print a warning above the bar without tearing it.
    pub fn log_warning(&self, message: &str) {
        match self.probe_progress {
            Some(ref pb) => pb.println(format!("⚠ {message}")),
            None if self.enabled => eprintln!("⚠ {message}"),
            None => {}
        }
    }
}
