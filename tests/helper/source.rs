//! Release source test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use version_monitor::version::error::FetchError;
use version_monitor::version::fetcher::ReleaseFetcher;
use version_monitor::version::registry::ReleaseSource;
use version_monitor::version::types::SourceKind;

#[derive(Debug, Clone)]
enum Release {
    Version(String),
    Failure,
}

/// In-memory GitHub release source
#[derive(Default)]
pub struct FakeSource {
    releases: Mutex<HashMap<String, Release>>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `version` as the latest release of `owner/repo`
    pub fn publish(&self, reference: &str, version: &str) {
        self.releases
            .lock()
            .unwrap()
            .insert(reference.to_string(), Release::Version(version.to_string()));
    }

    /// Make every fetch for `reference` fail with a server error
    pub fn fail(&self, reference: &str) {
        self.releases
            .lock()
            .unwrap()
            .insert(reference.to_string(), Release::Failure);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReleaseSource for FakeSource {
    fn source_kind(&self) -> SourceKind {
        SourceKind::GitHubRelease
    }

    async fn fetch_latest(&self, reference: &str) -> Result<Option<String>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let release = self.releases.lock().unwrap().get(reference).cloned();
        match release {
            Some(Release::Version(version)) => Ok(Some(version)),
            Some(Release::Failure) => Err(FetchError::BadResponse(
                "Unexpected status: 500 Internal Server Error".to_string(),
            )),
            None => Ok(None),
        }
    }
}

/// Fetcher dispatching GitHub locators to `source`
pub fn create_test_fetcher(source: &Arc<FakeSource>) -> Arc<ReleaseFetcher> {
    let source: Arc<dyn ReleaseSource> = source.clone();
    Arc::new(ReleaseFetcher::new(vec![source], Duration::from_secs(10)))
}
