//! JSON manifest source (a document with a top-level `version` field)

use crate::version::error::FetchError;
use crate::version::registry::ReleaseSource;
use crate::version::types::SourceKind;
use serde_json::Value;
use tracing::warn;

/// Release source that reads `version` from a JSON document at a URL
pub struct ManifestSource {
    client: reqwest::Client,
}

impl ManifestSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Extract the `version` field of a manifest, accepting numbers as well as strings
pub fn manifest_version(manifest: &Value) -> Option<String> {
    match manifest.get("version")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait::async_trait]
impl ReleaseSource for ManifestSource {
    fn source_kind(&self) -> SourceKind {
        SourceKind::Manifest
    }

    async fn fetch_latest(&self, reference: &str) -> Result<Option<String>, FetchError> {
        let response = self
            .client
            .get(reference)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Manifest request returned status {}: {}", status, reference);
            return Err(FetchError::BadResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let manifest: Value = response.json().await.map_err(|e| {
            warn!("Failed to parse manifest {}: {}", reference, e);
            FetchError::BadResponse(e.to_string())
        })?;

        manifest_version(&manifest)
            .map(Some)
            .ok_or_else(|| FetchError::BadResponse("missing version field".to_string()))
    }
}
