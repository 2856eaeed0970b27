//! Host collaborator fakes

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use version_monitor::monitor::host::{Clock, ModuleHost};
use version_monitor::monitor::report::{Presenter, Report, Summary};

/// Installed modules keyed by id
#[derive(Default)]
pub struct FakeHost {
    modules: Mutex<HashMap<String, (String, bool)>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, id: &str, version: &str) {
        self.modules
            .lock()
            .unwrap()
            .insert(id.to_string(), (version.to_string(), true));
    }

    #[allow(dead_code)]
    pub fn disable(&self, id: &str) {
        if let Some(module) = self.modules.lock().unwrap().get_mut(id) {
            module.1 = false;
        }
    }
}

impl ModuleHost for FakeHost {
    fn is_installed(&self, id: &str) -> bool {
        self.modules.lock().unwrap().contains_key(id)
    }

    fn is_active(&self, id: &str) -> bool {
        self.modules
            .lock()
            .unwrap()
            .get(id)
            .is_some_and(|(_, active)| *active)
    }

    fn installed_version(&self, id: &str) -> Option<String> {
        self.modules
            .lock()
            .unwrap()
            .get(id)
            .map(|(version, _)| version.clone())
    }
}

/// Clock that only moves when told to
pub struct FixedClock {
    now_ms: AtomicI64,
}

impl FixedClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms
            .fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Presenter that keeps everything it is given
#[derive(Default)]
pub struct RecordingPresenter {
    summaries: Mutex<Vec<Summary>>,
    reports: Mutex<Vec<Report>>,
}

impl RecordingPresenter {
    pub fn summaries(&self) -> Vec<Summary> {
        self.summaries.lock().unwrap().clone()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }
}

impl Presenter for RecordingPresenter {
    fn summary(&self, summary: &Summary) {
        self.summaries.lock().unwrap().push(*summary);
    }

    fn on_cycle_complete(&self, report: &Report) {
        self.reports.lock().unwrap().push(report.clone());
    }
}
