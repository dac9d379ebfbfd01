//! Common test utilities for integration tests.

pub mod cluster_sim;
pub mod fixtures;

use mdsctl::config::WaitConfig;
use mdsctl::mds::FilesystemManager;
use mdsctl::version::{ClusterVersion, QUINCY, REEF};
use std::sync::Arc;
use std::time::Duration;

// Re-export common types
pub use cluster_sim::*;
pub use fixtures::*;

/// Manager wired to fakes, for a cluster running `version`.
pub struct TestEnv {
    pub gateway: Arc<FakeGateway>,
    pub pools: Arc<FakePoolCatalog>,
    pub manager: FilesystemManager,
}

impl TestEnv {
    pub fn new(version: ClusterVersion) -> Self {
        Self::with_pools(version, FakePoolCatalog::default())
    }

    pub fn with_pools(version: ClusterVersion, pools: FakePoolCatalog) -> Self {
        let gateway = Arc::new(FakeGateway::new());
        let pools = Arc::new(pools);
        let manager = FilesystemManager::new(gateway.clone(), pools.clone(), version)
            .with_wait_config(fast_waits());
        Self {
            gateway,
            pools,
            manager,
        }
    }

    /// Cluster new enough to reject duplicate pool attaches.
    pub fn reef() -> Self {
        Self::new(ClusterVersion::new(REEF.major, 2, 1))
    }

    /// Cluster that accepts duplicate pool attaches silently.
    pub fn quincy() -> Self {
        Self::new(ClusterVersion::new(QUINCY.major, 2, 7))
    }
}

/// One-second ticks for paused-time tests.
pub fn fast_waits() -> WaitConfig {
    WaitConfig {
        rank_interval: Duration::from_secs(1),
        rank_timeout: Duration::from_secs(5),
        standby_interval: Duration::from_secs(1),
        standby_timeout: Duration::from_secs(5),
    }
}
