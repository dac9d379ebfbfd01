//! Rank and standby resolution over decoded rank maps.
//!
//! Rank maps identify daemons in two steps: `up` maps a rank token
//! (`mds_<rank>`) to a group id, and `info` maps a group id token
//! (`gid_<gid>`) to the daemon itself. Both steps can miss independently.
//!
//! # Standby ownership
//!
//! The cluster-wide dump lists plain standbys without saying which filesystem
//! they were started for. Ownership is inferred from the daemon name alone: a
//! standby belongs to filesystem `myfs` when it is named `myfs-<letter>` with
//! exactly one lowercase ASCII letter, e.g. `myfs-a`. This is a naming
//! convention, not something the cluster guarantees. Daemons deployed under
//! any other naming scheme are never matched (false negatives are expected).

use super::types::{FilesystemDetails, MdsDump, MdsInfo, MdsMap, Rank};
use crate::error::{MdsError, Result};
use regex::Regex;
use tracing::debug;

/// Key of a rank in [`MdsMap::up`].
pub fn rank_key(rank: Rank) -> String {
    format!("mds_{}", rank)
}

/// Key of a daemon in [`MdsMap::info`].
pub fn gid_key(gid: i64) -> String {
    format!("gid_{}", gid)
}

/// Decode `fs get` output.
pub fn parse_filesystem_details(buf: &[u8]) -> Result<FilesystemDetails> {
    serde_json::from_slice(buf).map_err(|e| {
        MdsError::Parse(format!(
            "unmarshal failed raw buffer response {}: {}",
            String::from_utf8_lossy(buf),
            e
        ))
    })
}

/// Decode `fs dump` output.
pub fn parse_mds_dump(buf: &[u8]) -> Result<MdsDump> {
    serde_json::from_slice(buf).map_err(|e| {
        MdsError::Parse(format!(
            "failed to unmarshal fs dump {}: {}",
            String::from_utf8_lossy(buf),
            e
        ))
    })
}

/// Daemon currently serving `rank`.
pub fn daemon_for_rank(map: &MdsMap, rank: Rank) -> Result<&MdsInfo> {
    let gid = map.up.get(&rank_key(rank)).ok_or_else(|| {
        MdsError::NotFound(format!(
            "mds gid for rank {} in filesystem {:?}",
            rank, map.filesystem_name
        ))
    })?;

    map.info.get(&gid_key(*gid)).ok_or_else(|| {
        MdsError::NotFound(format!(
            "mds info for rank {} (gid {}) in filesystem {:?}",
            rank, gid, map.filesystem_name
        ))
    })
}

/// Name of the daemon currently serving `rank`.
pub fn daemon_name_for_rank(details: &FilesystemDetails, rank: Rank) -> Result<String> {
    daemon_for_rank(&details.mds_map, rank).map(|info| info.name.clone())
}

/// Daemons in standby-replay state.
pub fn standby_replay_daemons(details: &FilesystemDetails) -> impl Iterator<Item = &MdsInfo> {
    details
        .mds_map
        .info
        .values()
        .filter(|info| info.is_standby_replay())
}

/// Number of ranks with a daemon up.
pub fn up_daemon_count(map: &MdsMap) -> usize {
    map.up.len()
}

fn standby_name_pattern(fs_name: &str) -> Option<Regex> {
    Regex::new(&format!("^{}-[a-z]$", regex::escape(fs_name))).ok()
}

/// Whether a standby named `standby_name` belongs to `fs_name`, by naming convention.
pub fn filesystem_owns_standby(fs_name: &str, standby_name: &str) -> bool {
    standby_name_pattern(fs_name).is_some_and(|re| re.is_match(standby_name))
}

/// Whether the dump still lists a standby belonging to `fs_name`.
pub fn filesystem_has_standby(dump: &MdsDump, fs_name: &str) -> bool {
    let Some(pattern) = standby_name_pattern(fs_name) else {
        return false;
    };
    let owned = dump.standbys.iter().find(|s| pattern.is_match(&s.name));
    if let Some(standby) = owned {
        debug!(fs = %fs_name, standby = %standby.name, "Filesystem still has a standby");
    }
    owned.is_some()
}
