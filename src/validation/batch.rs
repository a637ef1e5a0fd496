use std::sync::Arc;

use futures::{StreamExt, stream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::error::{NetSiftError, Result};
use crate::core::types::ProbeResult;
use crate::validation::checker::Probe;

/// Runs a [`Probe`] over many URLs with bounded concurrency.
///
/// Results come back in input order regardless of completion order, and
/// duplicate URLs are probed once per occurrence.
pub struct BatchRunner<P> {
    probe: Arc<P>,
    concurrency: usize,
}

impl<P> Clone for BatchRunner<P> {
    fn clone(&self) -> Self {
        Self {
            probe: Arc::clone(&self.probe),
            concurrency: self.concurrency,
        }
    }
}

impl<P: Probe + 'static> BatchRunner<P> {
    pub fn new(probe: P, concurrency: usize) -> Self {
        Self::with_shared(Arc::new(probe), concurrency)
    }

    pub fn with_shared(probe: Arc<P>, concurrency: usize) -> Self {
        Self {
            probe,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Probe every URL, calling `on_progress(completed, total)` after each
    /// probe finishes.
    pub async fn run<F>(&self, urls: &[String], on_progress: F) -> Vec<ProbeResult>
    where
        F: FnMut(usize, usize),
    {
        let token = CancellationToken::new();
        // The token never fires, so the run always completes
        self.run_with_cancellation(urls, on_progress, &token)
            .await
            .unwrap_or_default()
    }

    /// Like [`run`](Self::run), but stops as soon as `token` is cancelled.
    ///
    /// In-flight probes are dropped on cancellation and the error reports how
    /// many probes had completed.
    pub async fn run_with_cancellation<F>(
        &self,
        urls: &[String],
        mut on_progress: F,
        token: &CancellationToken,
    ) -> Result<Vec<ProbeResult>>
    where
        F: FnMut(usize, usize),
    {
        let total = urls.len();
        let mut slots: Vec<Option<ProbeResult>> = vec![None; total];
        let mut completed = 0;

        let mut results = stream::iter(urls.iter().cloned().enumerate())
            .map(|(index, url)| {
                let probe = Arc::clone(&self.probe);
                async move { (index, probe.probe(&url).await) }
            })
            .buffer_unordered(self.concurrency);

        loop {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    return Err(NetSiftError::Cancelled { completed, total });
                }
                next = results.next() => match next {
                    Some((index, result)) => {
                        slots[index] = Some(result);
                        completed += 1;
                        on_progress(completed, total);
                    }
                    None => break,
                },
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Start a run on the tokio runtime and return a handle to cancel or
    /// await it.
    pub fn spawn<F>(&self, urls: Vec<String>, on_progress: F) -> BatchHandle
    where
        F: FnMut(usize, usize) + Send + 'static,
    {
        let runner = self.clone();
        let token = CancellationToken::new();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            runner
                .run_with_cancellation(&urls, on_progress, &task_token)
                .await
        });

        BatchHandle { token, handle }
    }
}

/// A batch run executing in the background.
pub struct BatchHandle {
    token: CancellationToken,
    handle: JoinHandle<Result<Vec<ProbeResult>>>,
}

impl BatchHandle {
    /// Request cancellation; [`join`](Self::join) then yields
    /// [`NetSiftError::Cancelled`] unless the run had already finished.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// A token that cancels this run, for signal handlers and other tasks.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub async fn join(self) -> Result<Vec<ProbeResult>> {
        self.handle.await?
    }
}

/// Counts over a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    /// Probes that got any HTTP response
    pub reachable: usize,
    pub errors: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[ProbeResult]) -> Self {
        let errors = results.iter().filter(|r| r.is_error()).count();
        Self {
            total: results.len(),
            reachable: results.len() - errors,
            errors,
        }
    }
}
