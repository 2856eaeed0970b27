//! Stable digest of the latest versions seen in a cycle

use crate::version::semver::normalize_version;
use crate::version::types::{CheckResult, VersionStatus};

const SEPARATOR: &str = "|";
const MISSING_VERSION: &str = "?";

/// Reduce results to `id@latest` pairs sorted by id and joined with `|`.
///
/// Only the id and latest version contribute, so the digest does not depend
/// on completion order, installed versions or statuses. Packages that are
/// not installed always count as `?`, whether or not the cycle fetched them.
pub fn digest(results: &[CheckResult]) -> String {
    let mut entries: Vec<(&str, &str)> = results
        .iter()
        .map(|r| {
            let latest = r
                .latest_version
                .as_deref()
                .filter(|_| r.status != VersionStatus::NotInstalled)
                .map(normalize_version)
                .filter(|v| !v.is_empty())
                .unwrap_or(MISSING_VERSION);
            (r.id.as_str(), latest)
        })
        .collect();
    entries.sort_unstable();

    entries
        .iter()
        .map(|(id, latest)| format!("{}@{}", id, latest))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}
