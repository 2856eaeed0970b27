//! Shared fixtures for monitor integration tests

#![allow(dead_code)]

mod host;
mod source;

use std::sync::Arc;

pub use host::{FakeHost, FixedClock, RecordingPresenter};
pub use source::{FakeSource, create_test_fetcher};

use version_monitor::config::MonitorConfig;
use version_monitor::monitor::host::{ConfiguredOperators, OperatorRole};
use version_monitor::monitor::{Collaborators, Monitor};
use version_monitor::state::{MemoryStore, StateStore};
use version_monitor::version::fetcher::ReleaseFetcher;
use version_monitor::version::types::{SourceLocator, WatchedPackage};

pub const NOW: i64 = 1_700_000_000_000;

/// A watched package released on GitHub as `owner/<id>`
pub fn github_package(id: &str) -> WatchedPackage {
    WatchedPackage {
        id: id.to_string(),
        display_name: format!("Module {}", id),
        source_locator: SourceLocator::GitHubRelease {
            owner: "owner".to_string(),
            repo: id.to_string(),
        },
        release_page_url: format!("https://github.com/owner/{}/releases/latest", id),
    }
}

pub fn create_test_config(ids: &[&str]) -> MonitorConfig {
    MonitorConfig {
        jitter_seconds_max: 0,
        packages: ids.iter().map(|id| github_package(id)).collect(),
        ..MonitorConfig::default()
    }
}

/// Monitor wired to fakes that the test can drive between cycles
pub struct Harness {
    pub monitor: Monitor,
    pub host: Arc<FakeHost>,
    pub source: Arc<FakeSource>,
    pub clock: Arc<FixedClock>,
    pub presenter: Arc<RecordingPresenter>,
    pub store: Arc<dyn StateStore>,
}

impl Harness {
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(config: MonitorConfig, store: Arc<dyn StateStore>) -> Self {
        let source = Arc::new(FakeSource::new());
        let fetcher = create_test_fetcher(&source);
        let operator = Arc::new(ConfiguredOperators::new(Vec::new(), None));
        Self::build(config, store, source, fetcher, operator)
    }

    pub fn build(
        config: MonitorConfig,
        store: Arc<dyn StateStore>,
        source: Arc<FakeSource>,
        fetcher: Arc<ReleaseFetcher>,
        operator: Arc<dyn OperatorRole>,
    ) -> Self {
        let host = Arc::new(FakeHost::new());
        let clock = Arc::new(FixedClock::new(NOW));
        let presenter = Arc::new(RecordingPresenter::default());

        let monitor = Monitor::new(
            &config,
            Collaborators {
                host: host.clone(),
                fetcher,
                store: store.clone(),
                clock: clock.clone(),
                operator,
                presenter: presenter.clone(),
            },
        );

        Self {
            monitor,
            host,
            source,
            clock,
            presenter,
            store,
        }
    }

    /// Install `id` at `installed` with `latest` published upstream
    pub fn watch(&self, id: &str, installed: &str, latest: &str) {
        self.host.install(id, installed);
        self.source.publish(&format!("owner/{}", id), latest);
    }

    pub fn reports_shown(&self) -> usize {
        self.presenter.reports().len()
    }
}
