//! update-watcher - OS release update watcher library
//!
//! This library provides the building blocks of a small daemon that:
//! - Reads the installed version from a `KEY=VALUE` release file
//! - Periodically fetches the latest published version over HTTP
//! - Compares both by semver precedence
//! - Requests a reboot when a newer release is available

pub mod action;
pub mod cli;
pub mod error;
pub mod monitor;
pub mod parser;
pub mod release;
pub mod source;
pub mod update;
