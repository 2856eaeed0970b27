//! GitHub Releases API source

use crate::version::error::FetchError;
use crate::version::registry::ReleaseSource;
use crate::version::types::SourceKind;
use serde::Deserialize;
use tracing::{info, warn};

/// Default base URL for GitHub API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Response from the latest release endpoint
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// Release source backed by `GET /repos/{owner}/{repo}/releases/latest`
pub struct GitHubReleaseSource {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubReleaseSource {
    /// Creates a new GitHubReleaseSource with a custom base URL
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ReleaseSource for GitHubReleaseSource {
    fn source_kind(&self) -> SourceKind {
        SourceKind::GitHubRelease
    }

    async fn fetch_latest(&self, reference: &str) -> Result<Option<String>, FetchError> {
        let url = format!("{}/repos/{}/releases/latest", self.base_url, reference);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();

        // GitHub answers 404 both for unknown repos and for repos without a release
        if status == reqwest::StatusCode::NOT_FOUND {
            info!("No published release for {}", reference);
            return Ok(None);
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(FetchError::BadResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let release: Release = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub release response: {}", e);
            FetchError::BadResponse(e.to_string())
        })?;

        Ok(Some(release.tag_name))
    }
}
