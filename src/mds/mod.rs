//! Metadata-service cluster management.
//!
//! - [`types`]: response shapes of the filesystem admin commands
//! - [`resolver`]: rank → daemon lookups and standby ownership
//! - [`poll`]: bounded convergence polling and the rank predicate
//! - [`lifecycle`]: the [`FilesystemManager`] orchestration layer
//! - [`cleanup`]: pool deletion after filesystem removal
//! - [`subvolume`]: subvolume listings

pub mod cleanup;
pub mod lifecycle;
pub mod poll;
pub mod resolver;
pub mod subvolume;
pub mod types;

pub use cleanup::delete_filesystem_pools;
pub use lifecycle::FilesystemManager;
pub use poll::{active_ranks_success, ranks_converged, PollConfig, Poller};
pub use resolver::{
    daemon_name_for_rank, filesystem_has_standby, filesystem_owns_standby,
    standby_replay_daemons,
};
pub use subvolume::NO_SUBVOLUME_GROUP;
pub use types::{
    Filesystem, FilesystemDetails, Gid, MdsDump, MdsInfo, MdsMap, MdsStandby, PoolId, Rank,
};
