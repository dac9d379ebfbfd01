// Response fixtures for integration tests

use mdsctl::mds::types::{
    FilesystemDetails, Gid, MdsDump, MdsInfo, MdsMap, MdsStandby, PoolId, Rank,
};

/// Builder for `fs get` responses
pub struct DetailsBuilder {
    details: FilesystemDetails,
}

impl DetailsBuilder {
    pub fn new(fs_name: &str) -> Self {
        Self {
            details: FilesystemDetails {
                id: 1,
                mds_map: MdsMap {
                    filesystem_name: fs_name.to_string(),
                    enabled: true,
                    ..Default::default()
                },
            },
        }
    }

    pub fn max_mds(mut self, max_mds: i64) -> Self {
        self.details.mds_map.max_mds = max_mds;
        self
    }

    pub fn pools(mut self, metadata_pool: PoolId, data_pools: &[PoolId]) -> Self {
        self.details.mds_map.metadata_pool = metadata_pool;
        self.details.mds_map.data_pools = data_pools.to_vec();
        self
    }

    /// Add an active daemon serving `rank`.
    pub fn active(mut self, rank: Rank, gid: Gid, name: &str) -> Self {
        self.details.mds_map.up.insert(format!("mds_{}", rank), gid);
        self.daemon(gid, name, rank, "up:active")
    }

    /// Add `count` active daemons for ranks `0..count`.
    pub fn active_ranks(mut self, count: usize) -> Self {
        let fs = self.details.mds_map.filesystem_name.clone();
        for rank in 0..count {
            let letter = (b'a' + rank as u8) as char;
            self = self.active(rank as Rank, 4000 + rank as Gid, &format!("{}-{}", fs, letter));
        }
        self
    }

    pub fn standby_replay(self, rank: Rank, gid: Gid, name: &str) -> Self {
        self.daemon(gid, name, rank, "up:standby-replay")
    }

    pub fn daemon(mut self, gid: Gid, name: &str, rank: Rank, state: &str) -> Self {
        self.details.mds_map.info.insert(
            format!("gid_{}", gid),
            MdsInfo {
                gid,
                name: name.to_string(),
                rank,
                state: state.to_string(),
                address: format!("10.0.0.{}:6800", gid % 250),
            },
        );
        self
    }

    pub fn build(self) -> FilesystemDetails {
        self.details
    }

    pub fn json(self) -> Vec<u8> {
        serde_json::to_vec(&self.details).unwrap()
    }
}

/// `fs dump` response listing the given standby names
pub fn dump_json(standbys: &[&str]) -> Vec<u8> {
    let dump = MdsDump {
        standbys: standbys
            .iter()
            .map(|name| MdsStandby {
                name: name.to_string(),
                rank: -1,
            })
            .collect(),
        filesystems: Vec::new(),
    };
    serde_json::to_vec(&dump).unwrap()
}
