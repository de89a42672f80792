//! Installed version lookup from the local release metadata file

use crate::error::ReleaseError;
use crate::parser::find_version_var;
use semver::Version;
use std::fs::File;
use std::path::Path;

/// Default location of the system release metadata
pub const DEFAULT_RELEASE_FILE: &str = "/etc/os-release";

/// Key holding the installed version in the release file
pub const DEFAULT_LOCAL_KEY: &str = "VERSION";

/// Read the currently installed version from `path`
///
/// The file handle is dropped before returning on every path.
pub fn read_current_version(path: &Path, key: &str) -> Result<Version, ReleaseError> {
    let file = File::open(path).map_err(|e| ReleaseError::open(path, e))?;
    find_version_var(key, file).map_err(|e| ReleaseError::extract(path, e))
}
