//! Reboot request actions triggered when a newer release is published
//!
//! This module provides:
//! - The `RebootAction` seam invoked by the poll loop
//! - A command runner (default: `locksmithctl send-need-reboot`)
//! - A log-only action for dry runs

use crate::error::{ActionError, ConfigError};
use async_trait::async_trait;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, info};

/// Default command used to ask the reboot manager for a reboot
pub const DEFAULT_REBOOT_COMMAND: &str = "locksmithctl send-need-reboot";

/// Trait for requesting a reboot once an update is detected
///
/// Implementations must yield while they wait, so the poll loop can still
/// observe shutdown in the middle of a request.
#[async_trait]
pub trait RebootAction: Send + Sync {
    /// Human readable description for logs
    fn name(&self) -> &str;

    /// Request the reboot
    async fn request_reboot(&self) -> Result<(), ActionError>;
}

/// Runs an external command with fixed arguments
#[derive(Debug, Clone)]
pub struct CommandAction {
    program: String,
    args: Vec<String>,
    display: String,
}

impl CommandAction {
    /// Create an action from a program and its arguments
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        let program = program.into();
        let display = std::iter::once(program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            program,
            args,
            display,
        }
    }

    /// Build an action from a whitespace separated command line
    pub fn from_command_line(command: &str) -> Result<Self, ConfigError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ConfigError::EmptyCommand)?;
        Ok(Self::new(program, parts.collect()))
    }

    /// Run the command and capture output
    ///
    /// The child is killed if the returned future is dropped before it exits.
    async fn run_command(&self) -> std::io::Result<Output> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
    }
}

impl Default for CommandAction {
    fn default() -> Self {
        Self::new("locksmithctl", vec!["send-need-reboot".to_string()])
    }
}

#[async_trait]
impl RebootAction for CommandAction {
    fn name(&self) -> &str {
        &self.display
    }

    async fn request_reboot(&self) -> Result<(), ActionError> {
        debug!("Running {}", self.display);

        let output = self
            .run_command()
            .await
            .map_err(|e| ActionError::spawn(&self.display, e))?;

        if output.status.success() {
            info!("Reboot requested via {}", self.display);
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(ActionError::failed(
                &self.display,
                output.status.to_string(),
                stderr,
            ))
        }
    }
}

/// Only logs; used for dry runs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOnlyAction;

#[async_trait]
impl RebootAction for LogOnlyAction {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn request_reboot(&self) -> Result<(), ActionError> {
        info!("Dry run: a reboot would be requested now");
        Ok(())
    }
}
