//! Latest version lookup with a per-request timeout
//!
//! Dispatches each locator to the [`ReleaseSource`] for its kind. Every
//! failure mode collapses to `None`; failures are only logged.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::version::error::FetchError;
use crate::version::registries::{GitHubReleaseSource, ManifestSource};
use crate::version::registry::ReleaseSource;
use crate::version::semver::normalize_version;
use crate::version::types::{SourceKind, SourceLocator};

pub struct ReleaseFetcher {
    sources: HashMap<SourceKind, Arc<dyn ReleaseSource>>,
    timeout: Duration,
}

impl ReleaseFetcher {
    /// Build a fetcher with the given sources, keyed by the kind each handles
    pub fn new(sources: Vec<Arc<dyn ReleaseSource>>, timeout: Duration) -> Self {
        let sources = sources
            .into_iter()
            .map(|source| (source.source_kind(), source))
            .collect();
        Self { sources, timeout }
    }

    /// Build a fetcher talking to the real GitHub API and manifest URLs
    pub fn with_default_sources(
        github_api_url: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("version-monitor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let sources: Vec<Arc<dyn ReleaseSource>> = vec![
            Arc::new(GitHubReleaseSource::new(client.clone(), github_api_url)),
            Arc::new(ManifestSource::new(client)),
        ];
        Ok(Self::new(sources, timeout))
    }

    /// Fetch the latest published version for a locator, without a leading
    /// tag prefix. Returns `None` on any failure.
    pub async fn fetch(&self, locator: &SourceLocator) -> Option<String> {
        match self.try_fetch(locator).await {
            Ok(Some(version)) => {
                debug!("Latest version for {} is {}", locator, version);
                Some(version)
            }
            Ok(None) => {
                info!("No published version for {}", locator);
                None
            }
            Err(e) => {
                warn!("Failed to fetch latest version for {}: {}", locator, e);
                None
            }
        }
    }

    async fn try_fetch(&self, locator: &SourceLocator) -> Result<Option<String>, FetchError> {
        let Some(source) = self.sources.get(&locator.kind()) else {
            return Err(FetchError::BadResponse(format!(
                "no source configured for {}",
                locator.kind().as_str()
            )));
        };

        // Dropping the request future on timeout cancels it
        let version = tokio::time::timeout(self.timeout, source.fetch_latest(&locator.reference()))
            .await
            .map_err(|_| FetchError::Timeout {
                after_ms: self.timeout.as_millis() as u64,
            })??;

        Ok(version
            .map(|v| normalize_version(&v).to_string())
            .filter(|v| !v.is_empty()))
    }
}
