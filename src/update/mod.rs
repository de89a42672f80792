//! Update decision logic
//!
//! This module provides:
//! - Semver precedence comparison that ignores build metadata
//! - The decision whether a remote release is newer than the installed one

mod precedence;

pub use precedence::compare_precedence;

use semver::Version;
use std::cmp::Ordering;

/// Returns true if `remote` is strictly newer than `current`
///
/// Equal versions and downgrades never count as an update.
pub fn is_update_available(current: &Version, remote: &Version) -> bool {
    compare_precedence(current, remote) == Ordering::Less
}
