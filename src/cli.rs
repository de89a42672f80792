//! CLI argument parsing module for update-watcher

use crate::action::{CommandAction, LogOnlyAction, RebootAction, DEFAULT_REBOOT_COMMAND};
use crate::error::{AppError, ConfigError, FetchError};
use crate::monitor::Monitor;
use crate::release::{read_current_version, DEFAULT_LOCAL_KEY, DEFAULT_RELEASE_FILE};
use crate::source::{HttpClient, HttpVersionSource, DEFAULT_REMOTE_KEY};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Nanoseconds per duration unit suffix
fn unit_nanos(unit: &str) -> Option<u128> {
    Some(match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 60 * 60 * 1_000_000_000,
        _ => return None,
    })
}

/// Parse a duration string such as `300us`, `90s`, `1.5h` or `2h45m0.5s`
///
/// Each component is a decimal number with an optional fraction followed
/// by one of `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. A bare `0` is
/// accepted as zero; any other number needs a unit. Signs are rejected.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        value: s.to_string(),
    };

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }
    if trimmed == "0" {
        return Ok(Duration::ZERO);
    }

    let is_number = |c: char| c.is_ascii_digit() || c == '.';
    let mut total: u128 = 0;
    let mut rest = trimmed;

    while !rest.is_empty() {
        let number_end = rest.find(|c: char| !is_number(c)).unwrap_or(rest.len());
        let number = &rest[..number_end];
        rest = &rest[number_end..];

        let unit_end = rest.find(is_number).unwrap_or(rest.len());
        let scale = unit_nanos(&rest[..unit_end]).ok_or_else(invalid)?;
        rest = &rest[unit_end..];

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(invalid());
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let mut part = whole.checked_mul(scale).ok_or_else(invalid)?;

        // Digits past nanosecond precision of the largest unit cannot matter
        let fraction = &fraction[..fraction.len().min(18)];
        if !fraction.is_empty() {
            let numerator: u128 = fraction.parse().map_err(|_| invalid())?;
            let denominator = 10u128.pow(fraction.len() as u32);
            part += numerator * scale / denominator;
        }

        total = total.checked_add(part).ok_or_else(invalid)?;
    }

    let secs = u64::try_from(total / 1_000_000_000).map_err(|_| invalid())?;
    let nanos = (total % 1_000_000_000) as u32;
    Ok(Duration::new(secs, nanos))
}

/// Watches a remote version file and requests a reboot when a newer release appears
#[derive(Parser, Debug, Clone)]
#[command(
    name = "update-watcher",
    version,
    about = "Request a reboot when a newer OS release is published"
)]
pub struct CliArgs {
    /// URL to fetch the latest available version
    #[arg(long, default_value = "")]
    pub version_url: String,

    /// The delay between version checks (e.g., 90s, 30m, 1.5h, 1h30m)
    #[arg(long, default_value = "30m", value_parser = parse_duration)]
    pub delay: Duration,

    /// Release metadata file holding the installed version
    #[arg(long, default_value = DEFAULT_RELEASE_FILE)]
    pub release_file: PathBuf,

    /// Variable holding the installed version in the release file
    #[arg(long, default_value = DEFAULT_LOCAL_KEY)]
    pub local_key: String,

    /// Variable holding the published version in the remote document
    #[arg(long, default_value = DEFAULT_REMOTE_KEY)]
    pub remote_key: String,

    /// Command run to request a reboot once an update is detected
    #[arg(long, default_value = DEFAULT_REBOOT_COMMAND)]
    pub reboot_command: String,

    /// HTTP request timeout (default: no explicit timeout)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Log instead of requesting a reboot
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Run a single check and exit
    #[arg(long)]
    pub once: bool,

    /// Enable verbose (debug) logging
    #[arg(long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Reject configurations the daemon cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version_url.trim().is_empty() {
            return Err(ConfigError::MissingVersionUrl);
        }
        if !self.dry_run && self.reboot_command.trim().is_empty() {
            return Err(ConfigError::EmptyCommand);
        }
        if !self.once && self.delay.is_zero() {
            return Err(ConfigError::ZeroDelay);
        }
        Ok(())
    }

    /// Build the reboot action selected by the flags
    pub fn build_action(&self) -> Result<Box<dyn RebootAction>, ConfigError> {
        if self.dry_run {
            return Ok(Box::new(LogOnlyAction));
        }
        Ok(Box::new(CommandAction::from_command_line(&self.reboot_command)?))
    }

    /// Build the HTTP version source for the configured URL
    pub fn build_source(&self) -> Result<HttpVersionSource, FetchError> {
        let client = HttpClient::with_timeout(self.timeout)?;
        Ok(HttpVersionSource::new(
            client,
            self.version_url.trim(),
            self.remote_key.as_str(),
        ))
    }

    /// Validate the flags, read the installed version and wire the monitor
    ///
    /// Every error returned here is fatal: the daemon cannot poll without
    /// a valid configuration and installed version.
    pub fn build_monitor(&self) -> Result<Monitor, AppError> {
        self.validate()?;

        let current = read_current_version(&self.release_file, &self.local_key)?;
        tracing::info!(
            "Installed version {} (from {})",
            current,
            self.release_file.display()
        );

        let source = self.build_source()?;
        let action = self.build_action()?;
        Ok(Monitor::new(current, Box::new(source), action))
    }

    /// Default tracing directive for this crate
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "update_watcher=debug"
        } else {
            "update_watcher=info"
        }
    }
}
