//! Integration tests for update-watcher
//!
//! These tests verify:
//! - Reading the installed version from a release file on disk
//! - A full check cycle against a mock HTTP server
//! - Failed cycles never invoke the reboot action and do not stop later cycles

use mockito::{Server, ServerGuard};
use semver::Version;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use async_trait::async_trait;
use update_watcher::action::RebootAction;
use update_watcher::error::{ActionError, CheckError, ExtractError, FetchError, ReleaseError};
use update_watcher::monitor::{CycleOutcome, Monitor};
use update_watcher::release::{read_current_version, DEFAULT_LOCAL_KEY};
use update_watcher::source::{HttpClient, HttpVersionSource, DEFAULT_REMOTE_KEY};

/// Reboot action that only counts invocations
struct CountingAction {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl RebootAction for CountingAction {
    fn name(&self) -> &str {
        "counting"
    }

    async fn request_reboot(&self) -> Result<(), ActionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Write an os-release style file and return its directory guard
fn create_release_file(contents: &str) -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(temp_dir.path().join("os-release"), contents).unwrap();
    temp_dir
}

/// Build a monitor wired to the mock server, returning the action counter
fn build_monitor(release_dir: &TempDir, server: &ServerGuard) -> (Monitor, Arc<AtomicUsize>) {
    let current =
        read_current_version(&release_dir.path().join("os-release"), DEFAULT_LOCAL_KEY).unwrap();
    let source = HttpVersionSource::new(
        HttpClient::new().unwrap(),
        format!("{}/version.txt", server.url()),
        DEFAULT_REMOTE_KEY,
    );
    let calls = Arc::new(AtomicUsize::new(0));
    let action = CountingAction {
        calls: calls.clone(),
    };

    (
        Monitor::new(current, Box::new(source), Box::new(action)),
        calls,
    )
}

mod startup {
    use super::*;

    #[test]
    fn test_reads_version_from_os_release() {
        let dir = create_release_file(concat!(
            "NAME=\"Container Linux by CoreOS\"\n",
            "ID=coreos\n",
            "VERSION=1235.6.0\n",
            "VERSION_ID=1235.6.0\n",
        ));
        let version = read_current_version(&dir.path().join("os-release"), DEFAULT_LOCAL_KEY)
            .unwrap();
        assert_eq!(version, Version::new(1235, 6, 0));
    }

    /// Scenario: local file missing → fatal before polling
    #[test]
    fn test_missing_release_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_current_version(&dir.path().join("os-release"), DEFAULT_LOCAL_KEY)
            .unwrap_err();
        assert!(matches!(err, ReleaseError::Open { .. }));
    }

    #[test]
    fn test_release_file_without_version_is_fatal() {
        let dir = create_release_file("NAME=CoreOS\nID=coreos\n");
        let err = read_current_version(&dir.path().join("os-release"), DEFAULT_LOCAL_KEY)
            .unwrap_err();
        assert!(err.to_string().contains("os-release"));
    }
}

mod check_cycle {
    use super::*;

    /// Scenario: local 2.0.0, remote 2.1.0 → update available
    #[tokio::test]
    async fn test_newer_remote_requests_reboot() {
        let dir = create_release_file("VERSION=2.0.0\n");
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/version.txt")
            .with_status(200)
            .with_body("COREOS_BUILD=2\nCOREOS_VERSION=2.1.0\n")
            .create_async()
            .await;
        let (monitor, calls) = build_monitor(&dir, &server);

        let outcome = monitor.check_once().await;

        mock.assert_async().await;
        match outcome {
            CycleOutcome::UpdateRequested { current, remote } => {
                assert_eq!(current, Version::new(2, 0, 0));
                assert_eq!(remote, Version::new(2, 1, 0));
            }
            other => panic!("expected update, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    /// Scenario: local 2.1.0, remote 2.1.0 → no update
    #[tokio::test]
    async fn test_same_version_does_nothing() {
        let dir = create_release_file("VERSION=2.1.0\n");
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/version.txt")
            .with_status(200)
            .with_body("COREOS_VERSION=2.1.0\n")
            .create_async()
            .await;
        let (monitor, calls) = build_monitor(&dir, &server);

        let outcome = monitor.check_once().await;

        assert!(matches!(outcome, CycleOutcome::NotUpdated { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    /// Scenario: remote body lacks the key → logged, next cycle still runs
    #[tokio::test]
    async fn test_missing_remote_key_skips_cycle() {
        let dir = create_release_file("VERSION=2.0.0\n");
        let mut server = Server::new_async().await;
        let broken = server
            .mock("GET", "/version.txt")
            .with_status(200)
            .with_body("COREOS_BUILD=2\n")
            .create_async()
            .await;
        let (monitor, calls) = build_monitor(&dir, &server);

        let outcome = monitor.check_once().await;
        assert!(matches!(
            outcome,
            CycleOutcome::FetchFailed(CheckError::Extract(ExtractError::NotFound { ref key }))
                if key == "COREOS_VERSION"
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        broken.remove_async().await;
        let _fixed = server
            .mock("GET", "/version.txt")
            .with_status(200)
            .with_body("COREOS_VERSION=2.1.0\n")
            .create_async()
            .await;

        assert!(matches!(
            monitor.check_once().await,
            CycleOutcome::UpdateRequested { .. }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    /// Scenario: HTTP 503 → status logged, no parsing, next cycle still runs
    #[tokio::test]
    async fn test_unavailable_server_skips_cycle() {
        let dir = create_release_file("VERSION=2.0.0\n");
        let mut server = Server::new_async().await;
        let unavailable = server
            .mock("GET", "/version.txt")
            .with_status(503)
            // Would be an update if it were parsed
            .with_body("COREOS_VERSION=9.0.0\n")
            .expect(1)
            .create_async()
            .await;
        let (monitor, calls) = build_monitor(&dir, &server);

        let outcome = monitor.check_once().await;
        unavailable.assert_async().await;
        assert!(matches!(
            outcome,
            CycleOutcome::FetchFailed(CheckError::Fetch(FetchError::Status { status: 503, .. }))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        unavailable.remove_async().await;
        let _ok = server
            .mock("GET", "/version.txt")
            .with_status(200)
            .with_body("COREOS_VERSION=2.0.0\n")
            .create_async()
            .await;

        assert!(matches!(
            monitor.check_once().await,
            CycleOutcome::NotUpdated { .. }
        ));
    }

    #[tokio::test]
    async fn test_invalid_remote_version_is_parse_error() {
        let dir = create_release_file("VERSION=2.0.0\n");
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/version.txt")
            .with_status(200)
            .with_body("COREOS_VERSION=latest\n")
            .create_async()
            .await;
        let (monitor, calls) = build_monitor(&dir, &server);

        let outcome = monitor.check_once().await;

        assert!(matches!(
            outcome,
            CycleOutcome::FetchFailed(CheckError::Extract(ExtractError::Parse { ref value, .. }))
                if value == "latest"
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    /// The installed version is never refreshed, so the request repeats
    #[tokio::test]
    async fn test_update_is_requested_again_every_cycle() {
        let dir = create_release_file("VERSION=2.0.0\n");
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/version.txt")
            .with_status(200)
            .with_body("COREOS_VERSION=2.1.0\n")
            .expect(3)
            .create_async()
            .await;
        let (monitor, calls) = build_monitor(&dir, &server);

        for _ in 0..3 {
            assert!(matches!(
                monitor.check_once().await,
                CycleOutcome::UpdateRequested { .. }
            ));
        }

        mock.assert_async().await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(monitor.current_version(), &Version::new(2, 0, 0));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let dir = create_release_file("VERSION=2.0.0\n");
        let current =
            read_current_version(&dir.path().join("os-release"), DEFAULT_LOCAL_KEY).unwrap();
        let source = HttpVersionSource::new(
            HttpClient::new().unwrap(),
            "http://127.0.0.1:1/version.txt",
            DEFAULT_REMOTE_KEY,
        );
        let calls = Arc::new(AtomicUsize::new(0));
        let monitor = Monitor::new(
            current,
            Box::new(source),
            Box::new(CountingAction {
                calls: calls.clone(),
            }),
        );

        assert!(matches!(
            monitor.check_once().await,
            CycleOutcome::FetchFailed(CheckError::Fetch(FetchError::Transport { .. }))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
