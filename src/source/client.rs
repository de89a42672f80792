//! HTTP client shared foundation
//!
//! This module provides a thin reqwest wrapper with:
//! - Fixed User-Agent
//! - Optional request timeout (transport default otherwise)
//! - Strict 200 OK status check
//!
//! Failures are never retried here; the poll loop simply tries again on
//! its next cycle.

use crate::error::FetchError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("update-watcher/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(None, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Option<Duration>, user_agent: &str) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| FetchError::Client {
            message: e.to_string(),
        })?;

        Ok(Self { client })
    }

    /// Create a client with the default User-Agent and the given timeout
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, FetchError> {
        Self::with_config(timeout, DEFAULT_USER_AGENT)
    }

    /// Perform a GET request and return the raw body
    ///
    /// Anything but 200 OK is reported as [`FetchError::Status`] without
    /// reading the body.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::transport(url, format!("request timed out: {}", e))
            } else {
                FetchError::transport(url, e.to_string())
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::status(url, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::body(url, e.to_string()))?;

        Ok(body.to_vec())
    }
}
