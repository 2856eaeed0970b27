//! Check cycle orchestration

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::config::MonitorConfig;
use crate::monitor::aggregator::check_packages;
use crate::monitor::gate::{GateDecision, NotificationGate};
use crate::monitor::host::{Clock, ModuleHost, OperatorRole};
use crate::monitor::report::{Action, CheckMode, Presenter, Report};
use crate::monitor::scheduler::{CheckScheduler, Decision, SkipReason};
use crate::state::{CheckState, StateStore, keys};
use crate::version::error::StoreError;
use crate::version::fetcher::ReleaseFetcher;
use crate::version::types::WatchedPackage;

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("State store error: {0}")]
    Store(#[from] StoreError),
}

/// How a trigger ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The current actor may not trigger checks
    NotPermitted,
    /// Another cycle is in flight
    AlreadyRunning,
    Skipped(SkipReason),
    Completed(GateDecision),
    /// The cycle hit an unexpected error; it has been logged
    Failed,
}

/// Collaborators a [`Monitor`] is wired to
pub struct Collaborators {
    pub host: Arc<dyn ModuleHost>,
    pub fetcher: Arc<ReleaseFetcher>,
    pub store: Arc<dyn StateStore>,
    pub clock: Arc<dyn Clock>,
    pub operator: Arc<dyn OperatorRole>,
    pub presenter: Arc<dyn Presenter>,
}

/// Clears the in-flight flag when dropped
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Monitor {
    host: Arc<dyn ModuleHost>,
    fetcher: Arc<ReleaseFetcher>,
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    operator: Arc<dyn OperatorRole>,
    presenter: Arc<dyn Presenter>,
    gate: NotificationGate,
    scheduler: CheckScheduler,
    packages: Vec<WatchedPackage>,
    default_interval_hours: f64,
    diagnostic_mode: bool,
    in_flight: AtomicBool,
}

impl Monitor {
    pub fn new(config: &MonitorConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            host,
            fetcher,
            store,
            clock,
            operator,
            presenter,
        } = collaborators;

        Self {
            gate: NotificationGate::new(store.clone(), config.snooze_duration()),
            scheduler: CheckScheduler::new(config.jitter_max()),
            packages: config.packages.clone(),
            default_interval_hours: config.check_interval_hours,
            diagnostic_mode: config.diagnostic_mode,
            in_flight: AtomicBool::new(false),
            host,
            fetcher,
            store,
            clock,
            operator,
            presenter,
        }
    }

    /// Interval-triggered cycle
    ///
    /// In diagnostic mode this behaves like [`Monitor::run_manual`] and the
    /// detailed report is always shown.
    pub async fn run_scheduled(&self) -> CycleOutcome {
        if self.diagnostic_mode {
            info!("Diagnostic mode: bypassing schedule");
            return self.run_guarded(true).await;
        }
        self.run_guarded(false).await
    }

    /// Operator-initiated full report, bypassing the schedule
    pub async fn run_manual(&self) -> CycleOutcome {
        self.run_guarded(true).await
    }

    /// Apply one of the operator actions offered with the detailed report
    pub fn on_action(&self, action: Action) -> Result<(), MonitorError> {
        match action {
            Action::Hide => self.gate.hide()?,
            Action::Snooze => {
                self.gate.snooze(self.clock.now_ms())?;
            }
        }
        Ok(())
    }

    /// Persist a new check interval, overriding the configured default
    pub fn set_interval_hours(&self, hours: f64) -> Result<(), MonitorError> {
        info!("Setting check interval to {} hours", hours);
        self.store
            .set(keys::CHECK_INTERVAL_HOURS, &hours.to_string())?;
        Ok(())
    }

    pub fn state(&self) -> Result<CheckState, MonitorError> {
        Ok(CheckState::load(&*self.store, self.default_interval_hours)?)
    }

    async fn run_guarded(&self, forced: bool) -> CycleOutcome {
        if !self.operator.is_privileged() {
            debug!("Current user may not trigger checks");
            return CycleOutcome::NotPermitted;
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            info!("A check cycle is already running");
            return CycleOutcome::AlreadyRunning;
        };

        match AssertUnwindSafe(self.run_cycle(forced)).catch_unwind().await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                error!("Update check failed: {}", e);
                CycleOutcome::Failed
            }
            Err(_) => {
                error!("Update check panicked");
                CycleOutcome::Failed
            }
        }
    }

    async fn run_cycle(&self, forced: bool) -> Result<CycleOutcome, MonitorError> {
        let mode = if forced {
            CheckMode::Full
        } else {
            let state = self.state()?;
            let decision = self
                .scheduler
                .decide(self.clock.now_ms(), &state, &mut rand::thread_rng());
            match decision {
                Decision::Skip(reason) => {
                    debug!("Skipping scheduled check: {:?}", reason);
                    return Ok(CycleOutcome::Skipped(reason));
                }
                Decision::Run { delay } => {
                    if !delay.is_zero() {
                        debug!("Delaying check by {:?}", delay);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
            CheckMode::Scheduled
        };

        self.store
            .set(keys::LAST_CHECK_AT, &self.clock.now_ms().to_string())?;
        info!("Starting {:?} check of {} packages", mode, self.packages.len());

        let results = check_packages(&*self.host, &self.fetcher, &self.packages, mode).await;
        let decision = self.gate.evaluate(&results, mode, self.clock.now_ms())?;

        self.presenter.summary(&decision.summary);
        if decision.show_detail || self.diagnostic_mode {
            self.presenter
                .on_cycle_complete(&Report::build(&results, mode));
        } else if decision.out_of_date_count > 0 {
            warn!("{}", decision.summary);
        }

        info!("Check cycle complete: {}", decision.summary);
        Ok(CycleOutcome::Completed(decision))
    }
}
