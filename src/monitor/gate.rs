//! Suppression of repeat notifications
//!
//! Two independent flags suppress the detailed report: `hiddenUntilUpdate`,
//! cleared only when a cycle produces a new fingerprint, and `snoozedUntil`,
//! which simply expires.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::monitor::fingerprint;
use crate::monitor::report::{CheckMode, Summary};
use crate::state::{StateStore, StateStoreExt, keys};
use crate::version::error::StoreError;
use crate::version::types::CheckResult;

/// What the presentation layer should be given after a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
    pub fingerprint: String,
    pub fingerprint_changed: bool,
    pub out_of_date_count: usize,
    /// Always emitted
    pub summary: Summary,
    /// Whether the detailed report should be emitted
    pub show_detail: bool,
}

pub struct NotificationGate {
    store: Arc<dyn StateStore>,
    snooze_duration: Duration,
}

impl NotificationGate {
    pub fn new(store: Arc<dyn StateStore>, snooze_duration: Duration) -> Self {
        Self {
            store,
            snooze_duration,
        }
    }

    /// Record a completed cycle and decide whether to show the detailed report.
    ///
    /// Suppression flags are read after the fingerprint update so that a
    /// changed result set lifts `hiddenUntilUpdate` in the same cycle.
    pub fn evaluate(
        &self,
        results: &[CheckResult],
        mode: CheckMode,
        now_ms: i64,
    ) -> Result<GateDecision, StoreError> {
        let fingerprint = fingerprint::digest(results);
        let last_fingerprint = self.store.get_string(keys::LAST_FINGERPRINT)?;

        let fingerprint_changed = fingerprint != last_fingerprint;
        if fingerprint_changed {
            info!("Result fingerprint changed, clearing hide-until-update");
            debug!("Fingerprint {:?} -> {:?}", last_fingerprint, fingerprint);
            self.store.set(keys::HIDDEN_UNTIL_UPDATE, "false")?;
            self.store.set(keys::LAST_FINGERPRINT, &fingerprint)?;
        }

        let out_of_date_count = results
            .iter()
            .filter(|r| mode.counts_as_out_of_date(r.status))
            .count();

        let hidden = self.store.get_bool(keys::HIDDEN_UNTIL_UPDATE, false)?;
        let snoozed_until = self.store.get_i64(keys::SNOOZED_UNTIL, 0)?;
        let snoozed = now_ms < snoozed_until;

        let show_detail = out_of_date_count > 0 && !hidden && !snoozed;
        if out_of_date_count > 0 && !show_detail {
            info!(
                "Suppressing detailed report (hidden: {}, snoozed: {})",
                hidden, snoozed
            );
        }

        Ok(GateDecision {
            fingerprint,
            fingerprint_changed,
            out_of_date_count,
            summary: Summary::from_count(out_of_date_count),
            show_detail,
        })
    }

    /// Suppress the detailed report until the fingerprint next changes
    pub fn hide(&self) -> Result<(), StoreError> {
        info!("Hiding update notifications until the next update");
        self.store.set(keys::HIDDEN_UNTIL_UPDATE, "true")
    }

    /// Suppress the detailed report for the snooze duration, returning the deadline
    pub fn snooze(&self, now_ms: i64) -> Result<i64, StoreError> {
        let snooze_ms = i64::try_from(self.snooze_duration.as_millis()).unwrap_or(i64::MAX);
        let until = now_ms.saturating_add(snooze_ms);
        info!("Snoozing update notifications until {}", until);
        self.store.set(keys::SNOOZED_UNTIL, &until.to_string())?;
        Ok(until)
    }
}
