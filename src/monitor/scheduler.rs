//! Decides when a scheduled check cycle may run

use std::time::Duration;

use rand::Rng;

use crate::state::CheckState;

const MS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// Why a scheduled cycle was not started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Notifications are snoozed until the given epoch milliseconds
    Snoozed { until: i64 },
    /// The previous check is too recent; next one is due at the given epoch milliseconds
    NotDue { next_at: i64 },
}

/// Scheduling decision for one trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Start a cycle after sleeping for `delay`
    Run { delay: Duration },
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy)]
pub struct CheckScheduler {
    jitter_max: Duration,
}

impl CheckScheduler {
    pub fn new(jitter_max: Duration) -> Self {
        Self { jitter_max }
    }

    /// Decide whether a scheduled cycle runs at `now_ms`.
    ///
    /// A run carries a random delay in whole seconds, uniform over
    /// `[0, jitter_max]`, spreading installations that poll the same sources.
    pub fn decide<R: Rng + ?Sized>(&self, now_ms: i64, state: &CheckState, rng: &mut R) -> Decision {
        if now_ms < state.snoozed_until {
            return Decision::Skip(SkipReason::Snoozed {
                until: state.snoozed_until,
            });
        }

        let interval_ms = interval_ms(state.check_interval_hours);
        if now_ms.saturating_sub(state.last_check_at) < interval_ms {
            return Decision::Skip(SkipReason::NotDue {
                next_at: state.last_check_at.saturating_add(interval_ms),
            });
        }

        let jitter_secs = rng.gen_range(0..=self.jitter_max.as_secs());
        Decision::Run {
            delay: Duration::from_secs(jitter_secs),
        }
    }
}

/// Interval in milliseconds; negative or NaN hours count as zero
fn interval_ms(hours: f64) -> i64 {
    if hours.is_nan() || hours <= 0.0 {
        return 0;
    }
    (hours * MS_PER_HOUR).min(i64::MAX as f64) as i64
}
