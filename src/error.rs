//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ExtractError: Issues locating or parsing a `KEY=VALUE` version variable
//! - FetchError: Issues talking to the remote version endpoint
//! - CheckError: Any failure of a single poll cycle
//! - ReleaseError: Issues reading the local release file (fatal at startup)
//! - ActionError: Failures of the reboot request action
//! - ConfigError: Issues with CLI configuration

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Local release file related errors
    #[error(transparent)]
    Release(#[from] ReleaseError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Remote endpoint errors
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Errors produced while extracting a version variable from `KEY=VALUE` text
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The input stream could not be fully read
    #[error("failed to read input while looking for {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// No line assigned the requested key
    #[error("unable to find {key}")]
    NotFound { key: String },

    /// The key was found but its value is not a semantic version
    #[error("invalid version '{value}' for {key}: {source}")]
    Parse {
        key: String,
        value: String,
        #[source]
        source: semver::Error,
    },
}

/// Errors related to fetching the remote version document
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, DNS or timeout failure
    #[error("failed to fetch {url}: {message}")]
    Transport { url: String, message: String },

    /// Server replied with something other than 200 OK
    #[error("HTTP server replied {status} for {url}")]
    Status { url: String, status: u16 },

    /// Response body could not be read
    #[error("failed to read response body from {url}: {message}")]
    Body { url: String, message: String },

    /// HTTP client could not be constructed
    #[error("failed to create HTTP client: {message}")]
    Client { message: String },
}

/// A failed poll cycle
#[derive(Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Errors reading the installed version at startup
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Release file could not be opened
    #[error("failed to open release file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Release file did not yield a usable version
    #[error("invalid release file {path}: {source}")]
    Extract {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },
}

/// Errors from the reboot request action
#[derive(Error, Debug)]
pub enum ActionError {
    /// The command could not be started
    #[error("failed to execute '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited unsuccessfully
    #[error("'{command}' exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// --version-url missing or empty
    #[error("I require a version-url parameter")]
    MissingVersionUrl,

    /// --reboot-command has no program
    #[error("reboot command must not be empty")]
    EmptyCommand,

    /// --delay of zero would spin the loop
    #[error("delay between version checks must be greater than zero")]
    ZeroDelay,

    /// Invalid duration format
    #[error("invalid duration format '{value}': expected format like '90s', '30m', '1h30m'")]
    InvalidDuration { value: String },
}

impl ExtractError {
    /// Creates a new Read error
    pub fn read(key: impl Into<String>, source: std::io::Error) -> Self {
        ExtractError::Read {
            key: key.into(),
            source,
        }
    }

    /// Creates a new NotFound error
    pub fn not_found(key: impl Into<String>) -> Self {
        ExtractError::NotFound { key: key.into() }
    }

    /// Creates a new Parse error
    pub fn parse(key: impl Into<String>, value: impl Into<String>, source: semver::Error) -> Self {
        ExtractError::Parse {
            key: key.into(),
            value: value.into(),
            source,
        }
    }

    /// The key that was being searched for
    pub fn key(&self) -> &str {
        match self {
            ExtractError::Read { key, .. }
            | ExtractError::NotFound { key }
            | ExtractError::Parse { key, .. } => key,
        }
    }
}

impl FetchError {
    /// Creates a new Transport error
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new Status error
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        FetchError::Status {
            url: url.into(),
            status,
        }
    }

    /// Creates a new Body error
    pub fn body(url: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::Body {
            url: url.into(),
            message: message.into(),
        }
    }
}

impl ReleaseError {
    /// Creates a new Open error
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReleaseError::Open {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Extract error
    pub fn extract(path: impl Into<PathBuf>, source: ExtractError) -> Self {
        ReleaseError::Extract {
            path: path.into(),
            source,
        }
    }
}

impl ActionError {
    /// Creates a new Spawn error
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        ActionError::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Creates a new Failed error
    pub fn failed(
        command: impl Into<String>,
        status: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        ActionError::Failed {
            command: command.into(),
            status: status.into(),
            stderr: stderr.into(),
        }
    }
}
