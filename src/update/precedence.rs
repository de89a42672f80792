//! Semantic version precedence
//!
//! `semver::Version`'s own `Ord` uses build metadata as a final tie-breaker,
//! which semver precedence forbids. This module compares the way the
//! semver specification orders releases: major, minor, patch, then
//! pre-release identifiers, with build metadata ignored.

use semver::Version;
use std::cmp::Ordering;

/// Compare two versions by semver precedence, ignoring build metadata
pub fn compare_precedence(a: &Version, b: &Version) -> Ordering {
    a.major
        .cmp(&b.major)
        .then_with(|| a.minor.cmp(&b.minor))
        .then_with(|| a.patch.cmp(&b.patch))
        // Prerelease::EMPTY sorts above any non-empty pre-release
        .then_with(|| a.pre.cmp(&b.pre))
}
