//! Storage cluster release versions.
//!
//! Some admin commands change behavior between releases. Callers compare the
//! reported version against the named thresholds below instead of matching
//! version strings.

use crate::error::{MdsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A cluster release version, ordered by major, minor, then patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClusterVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// First Quincy release.
pub const QUINCY: ClusterVersion = ClusterVersion::new(17, 0, 0);

/// First Reef release.
pub const REEF: ClusterVersion = ClusterVersion::new(18, 0, 0);

/// Releases from this one on reject attaching a data pool that is already
/// attached with `EINVAL`; older releases accept the duplicate silently.
pub const DUPLICATE_ATTACH_REJECTED_SINCE: ClusterVersion = REEF;

impl ClusterVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Whether this version is `other` or newer.
    pub fn is_at_least(&self, other: &ClusterVersion) -> bool {
        self >= other
    }
}

impl fmt::Display for ClusterVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for ClusterVersion {
    type Err = MdsError;

    /// Accepts a bare `18.2.1` or a full version banner such as
    /// `ceph version 18.2.1 (7fe91d5d) reef (stable)`.
    fn from_str(s: &str) -> Result<Self> {
        let token = s
            .split_whitespace()
            .find(|t| t.starts_with(|c: char| c.is_ascii_digit()))
            .ok_or_else(|| MdsError::Parse(format!("no version number in {:?}", s)))?;

        // Development builds carry a suffix like `18.2.1-123-gabcdef`.
        let numeric = token.split('-').next().unwrap_or(token);
        let mut parts = numeric.split('.').map(|p| {
            p.parse::<u32>()
                .map_err(|e| MdsError::Parse(format!("invalid version {:?}: {}", token, e)))
        });

        let major = parts
            .next()
            .transpose()?
            .ok_or_else(|| MdsError::Parse(format!("invalid version {:?}", token)))?;
        let minor = parts.next().transpose()?.unwrap_or(0);
        let patch = parts.next().transpose()?.unwrap_or(0);

        Ok(Self::new(major, minor, patch))
    }
}
