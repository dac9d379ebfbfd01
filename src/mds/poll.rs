//! Bounded polling for cluster state convergence.
//!
//! A [`Poller`] re-evaluates a check against freshly fetched cluster state at
//! a fixed interval. The number of evaluations is fixed up front from the
//! interval and the deadline: `max(1, ceil(timeout / interval))`. The first
//! evaluation runs immediately and each later one follows an interval sleep.
//!
//! The deadline is also enforced on the checks themselves: a check still
//! running when it passes is dropped and the poll fails. Cancellation
//! interrupts both the sleeps and an in-flight check.
//!
//! A check that fails to fetch state is logged and counted as "not yet".
//! Only running out of evaluations or time ([`MdsError::Timeout`]) or
//! cancellation ([`MdsError::Cancelled`]) end the poll with an error.

use super::resolver::up_daemon_count;
use super::types::MdsMap;
use crate::cancel::CancelToken;
use crate::error::{MdsError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{debug, error, warn};

/// Poll timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Time between evaluations.
    pub interval: Duration,
    /// Overall deadline.
    pub timeout: Duration,
}

impl PollConfig {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Number of times the check is evaluated before giving up.
    pub fn max_evaluations(&self) -> u64 {
        if self.interval.is_zero() {
            return 1;
        }
        let interval = self.interval.as_nanos();
        let evaluations = self.timeout.as_nanos().div_ceil(interval);
        u64::try_from(evaluations).unwrap_or(u64::MAX).max(1)
    }
}

/// Re-evaluates a check until it reports convergence.
pub struct Poller {
    config: PollConfig,
    cancel: CancelToken,
}

impl Poller {
    /// Create a new poller.
    pub fn new(config: PollConfig, cancel: CancelToken) -> Self {
        Self { config, cancel }
    }

    /// Evaluate `check` until it returns `Ok(true)`.
    ///
    /// `condition` describes the awaited state and is carried by the
    /// timeout and cancellation errors.
    pub async fn poll_until<F, Fut>(&self, condition: &str, mut check: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let evaluations = self.config.max_evaluations();
        let deadline = Instant::now() + self.config.timeout;

        for attempt in 1..=evaluations {
            if self.cancel.is_cancelled() {
                return Err(MdsError::Cancelled(condition.to_string()));
            }
            if attempt > 1 && Instant::now() >= deadline {
                break;
            }

            let outcome = tokio::select! {
                outcome = timeout_at(deadline, check()) => outcome,
                _ = self.cancel.cancelled() => {
                    return Err(MdsError::Cancelled(condition.to_string()));
                }
            };

            match outcome {
                Err(_) => {
                    debug!(condition = %condition, attempt, "Deadline passed during check");
                    break;
                }
                Ok(Ok(true)) => {
                    debug!(condition = %condition, attempt, "Condition reached");
                    return Ok(());
                }
                Ok(Ok(false)) => {
                    debug!(condition = %condition, attempt, evaluations, "Condition not reached yet");
                }
                Ok(Err(e)) if e.is_retryable() => {
                    warn!(condition = %condition, attempt, error = %e, "Transient failure checking condition");
                }
                Ok(Err(e)) => {
                    error!(condition = %condition, attempt, error = %e, "Failed to check condition");
                }
            }

            if attempt < evaluations {
                let wake = (Instant::now() + self.config.interval).min(deadline);
                tokio::select! {
                    _ = sleep_until(wake) => {}
                    _ = self.cancel.cancelled() => {
                        return Err(MdsError::Cancelled(condition.to_string()));
                    }
                }
            }
        }

        Err(MdsError::Timeout(condition.to_string()))
    }
}

/// Whether `up_count` daemons satisfy a target of `desired` ranks.
pub fn active_ranks_success(up_count: usize, desired: usize, allow_more: bool) -> bool {
    if allow_more {
        up_count >= desired
    } else {
        up_count == desired
    }
}

/// Whether a rank map has settled on `desired` ranks.
///
/// Both the configured `max_mds` and the number of up daemons must match.
/// During a transition the cluster can still have the previous target's
/// daemons up before it adopts the new `max_mds`, which must not count.
pub fn ranks_converged(map: &MdsMap, desired: usize, allow_more: bool) -> bool {
    usize::try_from(map.max_mds).is_ok_and(|max| max == desired)
        && active_ranks_success(up_daemon_count(map), desired, allow_more)
}
