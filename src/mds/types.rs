//! Response shapes returned by the filesystem admin commands.
//!
//! Field names follow the cluster's JSON output exactly. Every field defaults
//! when absent, so older or trimmed responses still decode.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Daemon group id, unique per running daemon instance.
pub type Gid = i64;

/// Metadata rank number.
pub type Rank = i64;

/// Numeric pool identifier.
pub type PoolId = i64;

/// Lifecycle state of a daemon in standby-replay.
pub const STATE_STANDBY_REPLAY: &str = "up:standby-replay";

/// Lifecycle state of a daemon serving a rank.
pub const STATE_ACTIVE: &str = "up:active";

/// One entry of `fs ls`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filesystem {
    pub name: String,
    pub metadata_pool: String,
    pub metadata_pool_id: PoolId,
    pub data_pools: Vec<String>,
    pub data_pool_ids: Vec<PoolId>,
}

/// Output of `fs get <name>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesystemDetails {
    pub id: i64,
    #[serde(rename = "mdsmap")]
    pub mds_map: MdsMap,
}

/// Rank map of a single filesystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdsMap {
    #[serde(rename = "fs_name")]
    pub filesystem_name: String,
    pub enabled: bool,
    pub root: Rank,
    #[serde(rename = "tableserver")]
    pub table_server: Rank,
    pub max_mds: i64,
    #[serde(rename = "in")]
    pub in_ranks: Vec<Rank>,
    /// `mds_<rank>` to group id of the daemon serving it.
    pub up: HashMap<String, Gid>,
    pub metadata_pool: PoolId,
    pub data_pools: Vec<PoolId>,
    pub failed: Vec<Rank>,
    pub damaged: Vec<Rank>,
    pub stopped: Vec<Rank>,
    /// `gid_<gid>` to daemon info.
    pub info: HashMap<String, MdsInfo>,
}

/// A daemon known to a filesystem's rank map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdsInfo {
    pub gid: Gid,
    pub name: String,
    pub rank: Rank,
    pub state: String,
    #[serde(rename = "addr")]
    pub address: String,
}

impl MdsInfo {
    /// Whether the daemon is replaying a rank's journal while on standby.
    pub fn is_standby_replay(&self) -> bool {
        self.state == STATE_STANDBY_REPLAY
    }
}

/// Output of `fs dump`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdsDump {
    pub standbys: Vec<MdsStandby>,
    pub filesystems: Vec<MdsMap>,
}

/// A daemon not attached to any filesystem rank.
///
/// `rank` is meaningless for true standbys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdsStandby {
    pub name: String,
    pub rank: Rank,
}

/// A subvolume group, as listed by `fs subvolumegroup ls`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubvolumeGroup {
    pub name: String,
}

/// A subvolume, as listed by `fs subvolume ls`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subvolume {
    pub name: String,
}

/// A subvolume snapshot, as listed by `fs subvolume snapshot ls`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubvolumeSnapshot {
    pub name: String,
}

/// Clones still being populated from a snapshot (`fs subvolume snapshot info`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotPendingClones {
    #[serde(rename = "pending_clones")]
    pub clones: Vec<PendingClone>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendingClone {
    pub name: String,
}
