//! Full cycle against HTTP release sources served by mockito

mod helper;

use std::sync::Arc;
use std::time::Duration;

use mockito::Server;

use helper::{FakeSource, Harness, github_package};
use version_monitor::monitor::CycleOutcome;
use version_monitor::monitor::host::ConfiguredOperators;
use version_monitor::monitor::report::Summary;
use version_monitor::state::MemoryStore;
use version_monitor::version::fetcher::ReleaseFetcher;
use version_monitor::version::types::{SourceLocator, VersionStatus, WatchedPackage};

#[tokio::test(flavor = "multi_thread")]
async fn reports_versions_from_github_and_manifest_sources() {
    let mut server = Server::new_async().await;
    let _release = server
        .mock("GET", "/repos/owner/a/releases/latest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"tag_name": "v1.4.0", "name": "Release 1.4.0"}"#)
        .create_async()
        .await;
    let _no_release = server
        .mock("GET", "/repos/owner/c/releases/latest")
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;
    let _manifest = server
        .mock("GET", "/b/module.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "b", "title": "Module B", "version": "2.1.0"}"#)
        .create_async()
        .await;

    let manifest_package = WatchedPackage {
        id: "b".to_string(),
        display_name: "Module b".to_string(),
        source_locator: SourceLocator::Manifest {
            url: format!("{}/b/module.json", server.url()),
        },
        release_page_url: String::new(),
    };
    let mut config = helper::create_test_config(&[]);
    config.github_api_url = server.url();
    config.packages = vec![github_package("a"), manifest_package, github_package("c")];

    let fetcher =
        ReleaseFetcher::with_default_sources(&config.github_api_url, Duration::from_secs(5))
            .unwrap();
    let harness = Harness::build(
        config,
        Arc::new(MemoryStore::new()),
        Arc::new(FakeSource::new()),
        Arc::new(fetcher),
        Arc::new(ConfiguredOperators::new(Vec::new(), None)),
    );
    harness.host.install("a", "1.2.0");
    harness.host.install("b", "2.1.0");
    harness.host.install("c", "0.1.0");

    let outcome = harness.monitor.run_scheduled().await;

    match outcome {
        CycleOutcome::Completed(decision) => {
            assert_eq!(decision.fingerprint, "a@1.4.0|b@2.1.0|c@?");
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(harness.presenter.summaries(), vec![Summary::OutOfDate(1)]);

    let report = &harness.presenter.reports()[0];
    assert_eq!(report.out_of_date[0].id, "a");
    assert_eq!(report.out_of_date[0].latest_version, Some("1.4.0".to_string()));
    assert_eq!(report.up_to_date[0].id, "b");
    assert_eq!(report.unknown[0].id, "c");
    assert_eq!(report.unknown[0].status, VersionStatus::Unknown);
}
