//! Completion poller.
//!
//! Before a mutating call against a droplet that may still be settling a
//! previous action (and optionally after one), the poller re-reads the
//! droplet's action history until no record is in progress or a wall-clock
//! budget runs out.
//!
//! ```text
//! Checking --pending--> sleep(interval) --> Checking
//! Checking --none pending--> Clear
//! Checking --deadline passed--> TimedOut
//! ```
//!
//! A time-out is not an error: the caller proceeds and the provider rejects
//! the next mutation if the droplet really is still busy. Failed checks are
//! logged and retried until the deadline. The deadline is a monotonic
//! [`Instant`], so slow responses shorten the number of checks rather than
//! extending the budget.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::clients::Transport;
use crate::rest::resources::ActionRecord;
use crate::rest::{ResourceError, ResourceKind};

/// Terminal state of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No action was pending at the last check.
    Clear {
        /// Number of history fetches performed.
        checks: u32,
    },
    /// The budget elapsed while actions were still pending.
    TimedOut {
        /// Number of history fetches performed.
        checks: u32,
        /// Time spent polling.
        elapsed: Duration,
    },
}

impl PollOutcome {
    /// Returns `true` for [`PollOutcome::Clear`].
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        matches!(self, Self::Clear { .. })
    }

    /// Returns the number of checks performed.
    #[must_use]
    pub const fn checks(&self) -> u32 {
        match self {
            Self::Clear { checks } | Self::TimedOut { checks, .. } => *checks,
        }
    }
}

/// Polls a droplet's action history until it is idle.
#[derive(Clone, Debug)]
pub struct CompletionPoller {
    transport: Transport,
    interval: Duration,
    timeout: Duration,
}

impl CompletionPoller {
    /// Creates a poller.
    #[must_use]
    pub const fn new(transport: Transport, interval: Duration, timeout: Duration) -> Self {
        Self {
            transport,
            interval,
            timeout,
        }
    }

    /// Returns the pause between two checks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the wall-clock budget.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches the in-progress actions of `droplet_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the history cannot be fetched.
    pub async fn pending_actions(&self, droplet_id: &str) -> Result<Vec<ActionRecord>, ResourceError> {
        let history = self
            .transport
            .list(ResourceKind::DropletActions, Some(droplet_id), &[])
            .await?;

        Ok(history
            .into_iter()
            .filter_map(|entity| ActionRecord::try_from(entity).ok())
            .filter(ActionRecord::is_pending)
            .collect())
    }

    /// Waits until `droplet_id` has no action in progress.
    ///
    /// A droplet that no longer exists has nothing pending and is reported
    /// as clear.
    pub async fn wait_until_idle(&self, droplet_id: &str) -> PollOutcome {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let mut checks = 0;

        loop {
            checks += 1;
            match self.pending_actions(droplet_id).await {
                Ok(pending) if pending.is_empty() => {
                    info!(droplet_id, checks, "no pending actions");
                    return PollOutcome::Clear { checks };
                }
                Ok(pending) => {
                    debug!(
                        droplet_id,
                        checks,
                        pending = pending.len(),
                        "actions still in progress"
                    );
                }
                Err(ResourceError::NotFound { .. }) => {
                    info!(droplet_id, checks, "droplet not found, nothing pending");
                    return PollOutcome::Clear { checks };
                }
                Err(error) => {
                    warn!(droplet_id, checks, %error, "action history check failed");
                }
            }

            let now = Instant::now();
            if now >= deadline {
                let elapsed = now - started;
                warn!(
                    droplet_id,
                    checks,
                    elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    "gave up waiting for pending actions"
                );
                return PollOutcome::TimedOut { checks, elapsed };
            }

            tokio::time::sleep(self.interval.min(deadline - now)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let clear = PollOutcome::Clear { checks: 2 };
        assert!(clear.is_clear());
        assert_eq!(clear.checks(), 2);

        let timed_out = PollOutcome::TimedOut {
            checks: 5,
            elapsed: Duration::from_secs(1),
        };
        assert!(!timed_out.is_clear());
        assert_eq!(timed_out.checks(), 5);
    }
}
