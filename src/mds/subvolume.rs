//! Subvolume listings.
//!
//! These commands can take a long time when a filesystem holds many
//! subvolumes, so they run through the timeout-bounded gateway path.

use super::lifecycle::FilesystemManager;
use super::types::{SnapshotPendingClones, Subvolume, SubvolumeGroup, SubvolumeSnapshot};
use crate::command::args;
use crate::error::{MdsError, Result, ResultExt};
use serde::de::DeserializeOwned;

/// Group name meaning "subvolumes not in any group".
pub const NO_SUBVOLUME_GROUP: &str = "";

fn decode<T: DeserializeOwned>(buf: &[u8], what: &str) -> Result<T> {
    serde_json::from_slice(buf)
        .map_err(|e| MdsError::Parse(format!("failed to unmarshal {}: {}", what, e)))
}

impl FilesystemManager {
    /// List the subvolume groups of a filesystem.
    pub async fn list_subvolume_groups(&self, fs_name: &str) -> Result<Vec<SubvolumeGroup>> {
        let buf = self
            .run_with_timeout(&args(&["fs", "subvolumegroup", "ls", fs_name]))
            .await
            .with_context(|| format!("failed to list subvolumegroups in filesystem {:?}", fs_name))?;
        decode(&buf, &format!("subvolumegroup list for filesystem {:?}", fs_name))
    }

    /// List the subvolumes in `group`, or ungrouped subvolumes for
    /// [`NO_SUBVOLUME_GROUP`].
    pub async fn list_subvolumes_in_group(
        &self,
        fs_name: &str,
        group: &str,
    ) -> Result<Vec<Subvolume>> {
        let mut cmd = args(&["fs", "subvolume", "ls", fs_name]);
        if group != NO_SUBVOLUME_GROUP {
            cmd.push(group.to_string());
        }

        let buf = self.run_with_timeout(&cmd).await.with_context(|| {
            format!(
                "failed to list subvolumes in filesystem {:?} subvolume group {:?}",
                fs_name, group
            )
        })?;
        decode(
            &buf,
            &format!("subvolume list for filesystem {:?} subvolume group {:?}", fs_name, group),
        )
    }

    /// List the snapshots of a subvolume.
    pub async fn list_subvolume_snapshots(
        &self,
        fs_name: &str,
        subvolume: &str,
        group: &str,
    ) -> Result<Vec<SubvolumeSnapshot>> {
        let buf = self
            .run_with_timeout(&args(&[
                "fs",
                "subvolume",
                "snapshot",
                "ls",
                fs_name,
                subvolume,
                "--group_name",
                group,
            ]))
            .await
            .with_context(|| {
                format!(
                    "failed to list snapshots of subvolume {:?} in filesystem {:?} subvolume group {:?}",
                    subvolume, fs_name, group
                )
            })?;
        decode(&buf, &format!("snapshots for subvolume {:?}", subvolume))
    }

    /// Clones still being populated from a subvolume snapshot.
    pub async fn list_snapshot_pending_clones(
        &self,
        fs_name: &str,
        subvolume: &str,
        snapshot: &str,
        group: &str,
    ) -> Result<SnapshotPendingClones> {
        let buf = self
            .run_with_timeout(&args(&[
                "fs",
                "subvolume",
                "snapshot",
                "info",
                fs_name,
                subvolume,
                snapshot,
                "--group_name",
                group,
            ]))
            .await
            .with_context(|| {
                format!(
                    "failed to list pending clones for snapshot {:?} in filesystem {:?} subvolume group {:?}",
                    snapshot, fs_name, group
                )
            })?;
        decode(&buf, &format!("pending clones for snapshot {:?}", snapshot))
    }
}
