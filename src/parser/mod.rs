//! Variable extraction from shell-style `KEY=VALUE` documents
//!
//! Both the local release file (`/etc/os-release`) and the remote version
//! document use the same line format:
//!
//! ```text
//! NAME=CoreOS
//! VERSION=2.0.0
//! ```
//!
//! Only the first line whose trimmed key matches is considered. Its trimmed
//! value must be a valid semantic version. Bytes that are not valid UTF-8
//! are replaced, so they only matter when they land in the matched value.

use crate::error::ExtractError;
use semver::Version;
use std::io::Read;

/// Split a line on its first `=` and trim both sides
///
/// Returns `None` for lines without an `=`.
pub fn parse_assignment(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), value.trim()))
}

/// Read the whole stream and look up `key` as a semantic version
///
/// The reader is consumed, so an owned file handle is closed when this
/// returns. Pass `&mut reader` to keep using it afterwards.
pub fn find_version_var<R: Read>(key: &str, mut input: R) -> Result<Version, ExtractError> {
    let mut bytes = Vec::new();
    input
        .read_to_end(&mut bytes)
        .map_err(|e| ExtractError::read(key, e))?;

    find_version_var_in_str(key, &String::from_utf8_lossy(&bytes))
}

/// Look up `key` in already-buffered `KEY=VALUE` text
pub fn find_version_var_in_str(key: &str, text: &str) -> Result<Version, ExtractError> {
    let value = text
        .lines()
        .filter_map(parse_assignment)
        .find_map(|(k, v)| (k == key).then_some(v))
        .ok_or_else(|| ExtractError::not_found(key))?;

    Version::parse(value).map_err(|e| ExtractError::parse(key, value, e))
}
