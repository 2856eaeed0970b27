//! Concurrent latest-version checks across all watched packages

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::monitor::host::ModuleHost;
use crate::monitor::report::CheckMode;
use crate::version::checker::derive_status;
use crate::version::fetcher::ReleaseFetcher;
use crate::version::types::{CheckResult, VersionStatus, WatchedPackage};

/// Check a single package
///
/// Reads the installed version from the host, fetches the latest one
/// (skipped for packages missing locally in a scheduled cycle) and derives
/// the status from the pair.
async fn check_package(
    host: &dyn ModuleHost,
    fetcher: &ReleaseFetcher,
    package: &WatchedPackage,
    mode: CheckMode,
) -> CheckResult {
    let installed = host.is_installed(&package.id);
    let installed_version = if installed {
        host.installed_version(&package.id)
    } else {
        None
    };

    let latest_version = if installed || mode == CheckMode::Full {
        fetcher.fetch(&package.source_locator).await
    } else {
        debug!("Skipping fetch for {}: not installed", package.id);
        None
    };

    let status = if installed {
        derive_status(installed_version.as_deref(), latest_version.as_deref())
    } else {
        VersionStatus::NotInstalled
    };

    debug!(
        "{}: installed={:?} latest={:?} status={}",
        package.id, installed_version, latest_version, status
    );

    CheckResult {
        id: package.id.clone(),
        display_name: package.display_name.clone(),
        installed_version,
        latest_version,
        status,
        release_page_url: package.release_page_url.clone(),
        active: host.is_active(&package.id),
    }
}

/// Check every package concurrently
///
/// Waits for all checks to settle. A check that panics is logged and left
/// out of the results; it never aborts its siblings.
pub async fn check_packages(
    host: &dyn ModuleHost,
    fetcher: &ReleaseFetcher,
    packages: &[WatchedPackage],
    mode: CheckMode,
) -> Vec<CheckResult> {
    let futures = packages.iter().map(|package| {
        AssertUnwindSafe(check_package(host, fetcher, package, mode))
            .catch_unwind()
            .map(move |outcome| (package, outcome))
    });

    let results: Vec<CheckResult> = join_all(futures)
        .await
        .into_iter()
        .filter_map(|(package, outcome)| {
            outcome
                .inspect_err(|_| warn!("Check for {} failed unexpectedly", package.id))
                .ok()
        })
        .collect();

    info!(
        "Checked {} of {} watched packages",
        results.len(),
        packages.len()
    );
    results
}
