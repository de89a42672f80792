//! Poll loop coordinating the version check workflow
//!
//! This module provides:
//! - Workflow coordination: fetch → extract → compare → act
//! - Timer-driven repetition with a fixed pause between cycles
//! - Explicit shutdown so callers (signal handlers, tests) can stop the loop
//!
//! The installed version is captured once at startup and owned by the
//! [`Monitor`]. It is never replaced, even after an update was detected,
//! so every later cycle re-requests the reboot until the host actually
//! restarts into the new release.

use crate::action::RebootAction;
use crate::error::{ActionError, CheckError, FetchError};
use crate::source::VersionSource;
use crate::update::is_update_available;
use semver::Version;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Default pause between two checks (30 minutes)
pub const DEFAULT_DELAY: Duration = Duration::from_secs(30 * 60);

/// Result of a single poll cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// Remote version could not be obtained; retried next cycle
    FetchFailed(CheckError),
    /// Remote is not newer than the installed version
    NotUpdated { current: Version, remote: Version },
    /// Remote is newer and the reboot request succeeded
    UpdateRequested { current: Version, remote: Version },
    /// Remote is newer but the reboot request failed
    ActionFailed {
        current: Version,
        remote: Version,
        error: ActionError,
    },
}

impl CycleOutcome {
    /// Whether the cycle ended in an error
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            CycleOutcome::FetchFailed(_) | CycleOutcome::ActionFailed { .. }
        )
    }
}

/// Periodic version checker
pub struct Monitor {
    /// Installed version read at startup
    current: Version,
    /// Where the latest published version comes from
    source: Box<dyn VersionSource>,
    /// What to do once a newer version is published
    action: Box<dyn RebootAction>,
}

impl Monitor {
    /// Create a new monitor for an already-resolved installed version
    pub fn new(
        current: Version,
        source: Box<dyn VersionSource>,
        action: Box<dyn RebootAction>,
    ) -> Self {
        Self {
            current,
            source,
            action,
        }
    }

    /// The installed version every cycle compares against
    pub fn current_version(&self) -> &Version {
        &self.current
    }

    /// Run one fetch → extract → compare → act cycle
    pub async fn check_once(&self) -> CycleOutcome {
        info!("Checking {}", self.source.url());

        let remote = match self.source.fetch_version().await {
            Ok(version) => version,
            Err(e) => {
                log_check_error(&e);
                return CycleOutcome::FetchFailed(e);
            }
        };

        debug!("Remote version {}", remote);

        let current = self.current.clone();
        if !is_update_available(&current, &remote) {
            info!("Not updated");
            return CycleOutcome::NotUpdated { current, remote };
        }

        info!("Updated: {} => {}", current, remote);
        match self.action.request_reboot().await {
            Ok(()) => CycleOutcome::UpdateRequested { current, remote },
            Err(e) => {
                error!("Reboot request via {} failed: {}", self.action.name(), e);
                CycleOutcome::ActionFailed {
                    current,
                    remote,
                    error: e,
                }
            }
        }
    }

    /// Check, pause for `delay`, repeat until `shutdown` resolves
    ///
    /// Returns the number of cycles that ran to completion. A cycle in
    /// flight when `shutdown` resolves is abandoned, including a reboot
    /// request that is still running.
    pub async fn run<F>(&self, delay: Duration, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut cycles = 0;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = self.check_once() => cycles += 1,
            }

            debug!("Next check in {:?}", delay);
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!("Stopped after {} checks", cycles);
        cycles
    }
}

fn log_check_error(err: &CheckError) {
    match err {
        CheckError::Fetch(FetchError::Status { status, url }) => {
            warn!("HTTP server replied {} for {}", status, url)
        }
        CheckError::Fetch(e) => warn!("Failed to fetch: {}", e),
        CheckError::Extract(e) => warn!("Remote {} unusable: {}", e.key(), e),
    }
}
