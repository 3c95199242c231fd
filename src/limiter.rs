/*!
 * Adaptive concurrency controller.
 *
 * The limiter tracks a target worker count for in-flight translation
 * calls and adjusts it from observed outcomes: sustained success grows it
 * multiplicatively on a cooldown, a rate-limit signal shrinks it
 * immediately with no cooldown. The batch translator re-reads
 * [`AdaptiveLimiter::current_permit_count`] every time a slot frees, so a
 * mid-batch backoff takes effect promptly.
 *
 * One limiter is shared by every concurrent call for a document (and may
 * be shared across documents); all state lives behind one mutex and the
 * clamp invariant `min_workers <= current_workers <= max_workers` holds
 * at every observable point.
 */

use log::{info, warn};
use parking_lot::Mutex;
use std::time::Instant;

use crate::app_config::ConcurrencyConfig;

/// Minimum outcomes in the rolling window before an increase is considered.
const MIN_SAMPLES: usize = 20;

#[derive(Debug)]
struct LimiterState {
    current_workers: f64,
    success_count: usize,
    total_count: usize,
    last_increase: Instant,
}

/// Process-wide adaptive rate limiter. Cheap to share via `Arc`.
#[derive(Debug)]
pub struct AdaptiveLimiter {
    min_workers: f64,
    max_workers: f64,
    backoff: f64,
    increase: f64,
    success_threshold: f64,
    increase_interval_secs: u64,
    state: Mutex<LimiterState>,
}

impl AdaptiveLimiter {
    pub fn new(config: &ConcurrencyConfig) -> Self {
        let min = config.min_workers.max(1) as f64;
        let max = (config.max_workers as f64).max(min);
        let initial = (config.initial_workers as f64).clamp(min, max);
        Self {
            min_workers: min,
            max_workers: max,
            backoff: config.rate_limit_backoff,
            increase: config.rate_limit_increase,
            success_threshold: config.success_threshold,
            increase_interval_secs: config.increase_interval_secs,
            state: Mutex::new(LimiterState {
                current_workers: initial,
                success_count: 0,
                total_count: 0,
                last_increase: Instant::now(),
            }),
        }
    }

    /// Record a successful call. Raises the worker target when the rolling
    /// success rate clears the threshold, enough samples have accumulated,
    /// and the increase cooldown has elapsed. Never lowers it.
    pub fn on_success(&self) {
        let mut state = self.state.lock();
        state.success_count += 1;
        state.total_count += 1;

        if state.total_count < MIN_SAMPLES {
            return;
        }
        let success_rate = state.success_count as f64 / state.total_count as f64;
        if success_rate < self.success_threshold
            || state.current_workers >= self.max_workers
            || state.last_increase.elapsed().as_secs() < self.increase_interval_secs
        {
            return;
        }

        let old = state.current_workers;
        state.current_workers = (old * self.increase).min(self.max_workers);
        state.last_increase = Instant::now();
        state.success_count = 0;
        state.total_count = 0;
        info!(
            "raising translation concurrency: {:.1} -> {:.1}",
            old, state.current_workers
        );
    }

    /// Record a rate-limit signal. Backs off immediately and
    /// unconditionally; only the clamp at `min_workers` bounds it.
    pub fn on_rate_limited(&self) {
        let mut state = self.state.lock();
        let old = state.current_workers;
        state.current_workers = (old * self.backoff).max(self.min_workers);
        state.total_count += 1;
        warn!(
            "rate limited, lowering translation concurrency: {:.1} -> {:.1}",
            old, state.current_workers
        );
    }

    /// Record a failure that is not a capacity signal (timeout, terminal
    /// error). Counts against the success rate but leaves the worker
    /// target untouched.
    pub fn on_failure(&self) {
        self.state.lock().total_count += 1;
    }

    /// The concurrency gate size the batch translator should use right
    /// now. Re-read frequently; never below one.
    pub fn current_permit_count(&self) -> usize {
        (self.state.lock().current_workers.round() as usize).max(1)
    }

    /// Current raw worker target, for reporting and tests.
    pub fn current_workers(&self) -> f64 {
        self.state.lock().current_workers
    }
}
