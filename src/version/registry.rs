//! Trait for reading the latest published version from one kind of source

#[cfg(test)]
use mockall::automock;

use crate::version::error::FetchError;
use crate::version::types::SourceKind;

/// Trait for fetching the latest release of a package from a remote source
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Returns the kind of locator this implementation handles
    fn source_kind(&self) -> SourceKind;

    /// Fetches the latest published version
    ///
    /// # Arguments
    /// * `reference` - Source-specific reference (e.g., "owner/repo" or a manifest URL)
    ///
    /// # Returns
    /// * `Ok(Some(version))` - The raw latest version string
    /// * `Ok(None)` - The source exists but has nothing published yet
    /// * `Err(FetchError)` - If the fetch fails
    async fn fetch_latest(&self, reference: &str) -> Result<Option<String>, FetchError>;
}
