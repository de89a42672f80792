//! Remote version sources
//!
//! This module provides:
//! - HTTP client shared foundation
//! - The `VersionSource` seam used by the poll loop
//! - An HTTP adapter reading a `KEY=VALUE` version document

mod client;

pub use client::HttpClient;

use crate::error::CheckError;
use crate::parser::find_version_var;
use async_trait::async_trait;
use semver::Version;

/// Key holding the published version in the remote document
pub const DEFAULT_REMOTE_KEY: &str = "COREOS_VERSION";

/// Trait for anything that can report the latest published version
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Where versions are fetched from, for logging
    fn url(&self) -> &str;

    /// Fetch and parse the latest published version
    async fn fetch_version(&self) -> Result<Version, CheckError>;
}

/// Version source backed by a plain HTTP GET
pub struct HttpVersionSource {
    client: HttpClient,
    url: String,
    key: String,
}

impl HttpVersionSource {
    /// Create a new HTTP version source
    pub fn new(client: HttpClient, url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            key: key.into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl VersionSource for HttpVersionSource {
    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_version(&self) -> Result<Version, CheckError> {
        let body = self.client.get_bytes(&self.url).await?;
        Ok(find_version_var(&self.key, body.as_slice())?)
    }
}
