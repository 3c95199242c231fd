/*!
 * Concurrent batch execution under the adaptive limiter.
 *
 * Tasks are scheduled onto a concurrency gate whose size is re-read from
 * the limiter every time a slot frees, so a backoff triggered mid-batch
 * shrinks in-flight work promptly instead of waiting for the batch to
 * drain. Results are collected by original task index because completion
 * order is nondeterministic under concurrency.
 */

use futures::stream::{FuturesUnordered, StreamExt};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::TranslationCommonConfig;
use crate::collector::TranslationTask;
use crate::errors::TranslateError;
use crate::limiter::AdaptiveLimiter;
use crate::terminology::Terminology;

use super::provider::Translator;

/// The result recorded for one task: the translation, or the failure
/// that exhausted its retries. A failed fragment never aborts the batch.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Translated(String),
    Failed(TranslateError),
}

impl TaskOutcome {
    pub fn is_translated(&self) -> bool {
        matches!(self, Self::Translated(_))
    }
}

/// Batch translator: fans a task list out over concurrent provider calls
/// bounded by the shared adaptive limiter.
pub struct BatchTranslator {
    provider: Arc<dyn Translator>,
    terminology: Arc<Terminology>,
    limiter: Arc<AdaptiveLimiter>,
    retry_count: u32,
    retry_backoff_ms: u64,
}

impl BatchTranslator {
    pub fn new(
        provider: Arc<dyn Translator>,
        terminology: Arc<Terminology>,
        limiter: Arc<AdaptiveLimiter>,
        common: &TranslationCommonConfig,
    ) -> Self {
        Self {
            provider,
            terminology,
            limiter,
            retry_count: common.retry_count,
            retry_backoff_ms: common.retry_backoff_ms,
        }
    }

    /// The limiter shared by this translator's calls.
    pub fn limiter(&self) -> &Arc<AdaptiveLimiter> {
        &self.limiter
    }

    /// Translate every task, returning outcomes addressable by the
    /// original task index regardless of completion order.
    pub async fn translate_all(&self, tasks: &[TranslationTask]) -> Vec<TaskOutcome> {
        if tasks.is_empty() {
            return Vec::new();
        }

        info!(
            "translating {} fragments (initial concurrency {})",
            tasks.len(),
            self.limiter.current_permit_count()
        );

        let mut results: Vec<Option<TaskOutcome>> = (0..tasks.len()).map(|_| None).collect();
        let mut pending = tasks.iter().enumerate();
        let mut in_flight = FuturesUnordered::new();

        loop {
            // Refill up to the limiter's current level; the level is
            // re-read here after every completion, never fixed at start.
            while in_flight.len() < self.limiter.current_permit_count() {
                match pending.next() {
                    Some((index, task)) => in_flight.push(self.run_task(index, task)),
                    None => break,
                }
            }

            match in_flight.next().await {
                Some((index, outcome)) => results[index] = Some(outcome),
                None => break,
            }
        }

        let outcomes: Vec<TaskOutcome> = results
            .into_iter()
            .map(|slot| slot.expect("every scheduled task produces exactly one outcome"))
            .collect();

        let failed = outcomes.iter().filter(|o| !o.is_translated()).count();
        if failed > 0 {
            warn!("{} of {} fragments failed translation", failed, outcomes.len());
        }
        outcomes
    }

    /// Run one task to completion: terminology substitution, the provider
    /// call, and retries per the error taxonomy.
    async fn run_task(&self, index: usize, task: &TranslationTask) -> (usize, TaskOutcome) {
        let (prepared, _) = self.terminology.apply(&task.text);

        let mut attempt: u32 = 0;
        loop {
            match self.provider.translate(&prepared, &task.context).await {
                Ok(translated) => {
                    self.limiter.on_success();
                    return (index, TaskOutcome::Translated(translated));
                }
                Err(err) => {
                    // Only a rate-limit signal adjusts capacity; timeouts
                    // reflect latency and just count against the window.
                    match &err {
                        TranslateError::RateLimited(_) => self.limiter.on_rate_limited(),
                        _ => self.limiter.on_failure(),
                    }

                    if !err.is_retryable() || attempt >= self.retry_count {
                        return (index, TaskOutcome::Failed(err));
                    }

                    let delay = self.retry_backoff_ms.saturating_mul(1 << attempt.min(8));
                    if delay > 0 {
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}
