//! Version status derivation for watched packages

use crate::version::semver::{CompareResult, compare_versions, normalize_version};
use crate::version::types::VersionStatus;

/// Derive the status of a package from its installed and latest versions.
///
/// Never reports `OutOfDate` without a successful comparison. When the two
/// versions cannot be ordered, textual equality after normalization still
/// counts as up to date.
pub fn derive_status(installed: Option<&str>, latest: Option<&str>) -> VersionStatus {
    let Some(installed) = installed else {
        return VersionStatus::NotInstalled;
    };
    let Some(latest) = latest else {
        return VersionStatus::Unknown;
    };

    let installed_norm = normalize_version(installed);
    let latest_norm = normalize_version(latest);
    if installed_norm.is_empty() || latest_norm.is_empty() {
        return VersionStatus::Unknown;
    }

    match compare_versions(installed_norm, latest_norm) {
        CompareResult::Latest => VersionStatus::UpToDate,
        CompareResult::Outdated => VersionStatus::OutOfDate,
        CompareResult::Newer => VersionStatus::Ahead,
        CompareResult::Invalid if installed_norm == latest_norm => VersionStatus::UpToDate,
        CompareResult::Invalid => VersionStatus::Unknown,
    }
}
