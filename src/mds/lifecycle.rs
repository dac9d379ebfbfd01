//! Filesystem lifecycle orchestration.
//!
//! [`FilesystemManager`] drives a filesystem through creation, rank scaling,
//! standby-replay draining, failover and removal. It keeps no state of its
//! own: every decision is made on cluster state fetched during the call.
//!
//! Concurrent calls against the same filesystem are not serialized. Create
//! and remove are sequences of independent commands and are not atomic.

use super::cleanup::delete_filesystem_pools;
use super::poll::{ranks_converged, PollConfig, Poller};
use super::resolver::{
    daemon_name_for_rank, filesystem_has_standby, parse_filesystem_details, parse_mds_dump,
    standby_replay_daemons,
};
use super::types::{Filesystem, FilesystemDetails, Gid, MdsDump, Rank};
use crate::cancel::CancelToken;
use crate::command::{args, CommandGateway, CONFIRM_FLAG};
use crate::config::{CommandConfig, WaitConfig};
use crate::error::{MdsError, Result, ResultExt};
use crate::pool::PoolCatalog;
use crate::version::{ClusterVersion, DUPLICATE_ATTACH_REJECTED_SINCE};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Manages filesystems and their metadata daemons.
pub struct FilesystemManager {
    gateway: Arc<dyn CommandGateway>,
    pools: Arc<dyn PoolCatalog>,
    /// Version reported by the cluster.
    version: ClusterVersion,
    /// Timeout for commands that may run long (listings).
    command_timeout: Duration,
    wait: WaitConfig,
    cancel: CancelToken,
}

impl FilesystemManager {
    /// Create a new manager with default timings.
    pub fn new(
        gateway: Arc<dyn CommandGateway>,
        pools: Arc<dyn PoolCatalog>,
        version: ClusterVersion,
    ) -> Self {
        Self {
            gateway,
            pools,
            version,
            command_timeout: CommandConfig::default().timeout,
            wait: WaitConfig::default(),
            cancel: CancelToken::new(),
        }
    }

    /// Set the timeout used for long-running commands.
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Set poll intervals and default deadlines.
    pub fn with_wait_config(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// Use `cancel` to abort convergence waits.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Version this manager gates behavior on.
    pub fn version(&self) -> ClusterVersion {
        self.version
    }

    pub(crate) async fn run_with_timeout(&self, args: &[String]) -> Result<Vec<u8>> {
        self.gateway.run_with_timeout(args, self.command_timeout).await
    }

    /// List all filesystems.
    pub async fn list_filesystems(&self) -> Result<Vec<Filesystem>> {
        let buf = self
            .gateway
            .run(&args(&["fs", "ls"]))
            .await
            .with_context(|| "failed to list filesystems")?;

        serde_json::from_slice(&buf).map_err(|e| {
            MdsError::Parse(format!(
                "unmarshal failed raw buffer response {}: {}",
                String::from_utf8_lossy(&buf),
                e
            ))
        })
    }

    /// Fetch the details and rank map of a filesystem.
    pub async fn get_filesystem(&self, fs_name: &str) -> Result<FilesystemDetails> {
        let buf = match self.gateway.run(&args(&["fs", "get", fs_name])).await {
            Ok(buf) => buf,
            Err(e) if e.exit_code() == Some(libc::ENOENT) => {
                return Err(MdsError::NotFound(format!("filesystem {:?}", fs_name)));
            }
            Err(e) => return Err(e.context(format!("failed to get filesystem {:?}", fs_name))),
        };
        let details = parse_filesystem_details(&buf)?;
        debug!(fs = %fs_name, id = details.id, max_mds = details.mds_map.max_mds, "Fetched filesystem");
        Ok(details)
    }

    /// Fetch the cluster-wide daemon dump.
    pub async fn get_mds_dump(&self) -> Result<MdsDump> {
        let buf = self
            .gateway
            .run(&args(&["fs", "dump"]))
            .await
            .with_context(|| "failed to dump fs info")?;
        parse_mds_dump(&buf)
    }

    /// Enable or disable standby-replay daemons for a filesystem.
    pub async fn allow_standby_replay(&self, fs_name: &str, allow: bool) -> Result<()> {
        info!(fs = %fs_name, allow, "Setting allow_standby_replay");
        let value = allow.to_string();
        self.gateway
            .run(&args(&["fs", "set", fs_name, "allow_standby_replay", &value]))
            .await
            .with_context(|| {
                format!("failed to set allow_standby_replay to {} for filesystem {:?}", allow, fs_name)
            })?;
        Ok(())
    }

    /// Create a filesystem on `metadata_pool` and the given data pools.
    ///
    /// The filesystem is created with the first data pool. The remaining pools
    /// are attached one by one; a pool that fails to attach is logged and
    /// skipped, and the call still succeeds.
    pub async fn create_filesystem<S: AsRef<str> + Sync>(
        &self,
        name: &str,
        metadata_pool: &str,
        data_pools: &[S],
    ) -> Result<()> {
        let Some((first, rest)) = data_pools.split_first() else {
            return Err(MdsError::InvalidArgument(format!(
                "at least one data pool is required to create filesystem {:?}",
                name
            )));
        };

        let pool_list: Vec<&str> = data_pools.iter().map(AsRef::as_ref).collect();
        info!(fs = %name, metadata_pool = %metadata_pool, data_pools = ?pool_list, "Creating filesystem");

        // Enable multiple filesystems in case this is not the first.
        self.gateway
            .run(&args(&["fs", "flag", "set", "enable_multiple", "true", CONFIRM_FLAG]))
            .await
            .with_context(|| "failed to enable multiple file systems")?;

        self.gateway
            .run(&args(&["fs", "new", name, metadata_pool, first.as_ref()]))
            .await
            .with_context(|| format!("failed enabling filesystem {:?}", name))?;

        for pool in rest {
            if let Err(e) = self.add_data_pool(name, pool.as_ref()).await {
                error!(fs = %name, pool = %pool.as_ref(), error = %e, "Failed to attach data pool");
            }
        }

        Ok(())
    }

    /// Attach a data pool to a filesystem.
    ///
    /// On clusters that reject duplicate attaches, the `EINVAL` returned for a
    /// pool that is already attached counts as success.
    pub async fn add_data_pool(&self, fs_name: &str, pool: &str) -> Result<()> {
        match self
            .gateway
            .run(&args(&["fs", "add_data_pool", fs_name, pool]))
            .await
        {
            Ok(_) => {
                info!(fs = %fs_name, pool = %pool, "Attached data pool");
                Ok(())
            }
            Err(e)
                if self.version.is_at_least(&DUPLICATE_ATTACH_REJECTED_SINCE)
                    && e.exit_code() == Some(libc::EINVAL) =>
            {
                debug!(fs = %fs_name, pool = %pool, "Data pool already attached");
                Ok(())
            }
            Err(e) => Err(e.context(format!(
                "failed to add pool {:?} to filesystem {:?}",
                pool, fs_name
            ))),
        }
    }

    /// Set the desired number of active ranks (`max_mds`).
    ///
    /// Does not wait; combine with [`Self::wait_for_active_ranks`].
    pub async fn set_num_mds_ranks(&self, fs_name: &str, count: u32) -> Result<()> {
        info!(fs = %fs_name, count, "Setting number of mds ranks");
        let count_str = count.to_string();
        self.gateway
            .run(&args(&["fs", "set", fs_name, "max_mds", &count_str]))
            .await
            .with_context(|| {
                format!("failed to set filesystem {} num mds ranks (max_mds) to {}", fs_name, count)
            })?;
        Ok(())
    }

    /// Fail every daemon of the filesystem that is in standby-replay.
    ///
    /// Stops at the first daemon that cannot be failed.
    pub async fn fail_all_standby_replay(&self, fs_name: &str) -> Result<()> {
        let details = self.get_filesystem(fs_name).await.with_context(|| {
            format!("failed to fail standby-replay MDSes for fs {:?}", fs_name)
        })?;

        for info in standby_replay_daemons(&details) {
            self.fail_mds(info.gid).await.with_context(|| {
                format!(
                    "failed to fail MDS {:?} for filesystem {:?} in up:standby-replay state",
                    info.name, fs_name
                )
            })?;
        }
        Ok(())
    }

    /// Name of the daemon serving `rank`.
    pub async fn mds_name_for_rank(&self, fs_name: &str, rank: Rank) -> Result<String> {
        let details = self
            .get_filesystem(fs_name)
            .await
            .with_context(|| "failed to get filesystem details")?;
        daemon_name_for_rank(&details, rank)
    }

    /// Wait until the filesystem runs `desired` ranks.
    ///
    /// With `allow_more`, more up daemons than `desired` also count.
    pub async fn wait_for_active_ranks(
        &self,
        fs_name: &str,
        desired: u32,
        allow_more: bool,
        timeout: Duration,
    ) -> Result<()> {
        let count_text = if allow_more {
            format!("{} or more", desired)
        } else {
            desired.to_string()
        };
        info!(fs = %fs_name, timeout_secs = timeout.as_secs_f64(), target = %count_text,
            "Waiting for number of active mds daemons");

        let condition = format!(
            "number of active mds daemons for filesystem {:?} to become {}",
            fs_name, count_text
        );
        let desired = desired as usize;
        let poller = Poller::new(
            PollConfig::new(self.wait.rank_interval, timeout),
            self.cancel.clone(),
        );
        poller
            .poll_until(&condition, move || async move {
                let details = self.get_filesystem(fs_name).await?;
                Ok::<_, MdsError>(ranks_converged(&details.mds_map, desired, allow_more))
            })
            .await?;

        debug!(fs = %fs_name, target = %count_text, "mds ranks reached target");
        Ok(())
    }

    /// [`Self::wait_for_active_ranks`] with the configured default deadline.
    pub async fn wait_for_active_ranks_default(
        &self,
        fs_name: &str,
        desired: u32,
        allow_more: bool,
    ) -> Result<()> {
        self.wait_for_active_ranks(fs_name, desired, allow_more, self.wait.rank_timeout)
            .await
    }

    /// Wait until the daemon dump lists no standby belonging to the filesystem.
    ///
    /// Ownership is decided by daemon name; see
    /// [`filesystem_owns_standby`](super::resolver::filesystem_owns_standby).
    pub async fn wait_for_no_standbys(
        &self,
        fs_name: &str,
        interval: Duration,
        timeout: Duration,
    ) -> Result<()> {
        let condition = format!("no standbys for filesystem {:?}", fs_name);
        let poller = Poller::new(PollConfig::new(interval, timeout), self.cancel.clone());
        poller
            .poll_until(&condition, move || async move {
                let dump = self.get_mds_dump().await?;
                Ok::<_, MdsError>(!filesystem_has_standby(&dump, fs_name))
            })
            .await
    }

    /// [`Self::wait_for_no_standbys`] with the configured default timings.
    pub async fn wait_for_no_standbys_default(&self, fs_name: &str) -> Result<()> {
        self.wait_for_no_standbys(fs_name, self.wait.standby_interval, self.wait.standby_timeout)
            .await
    }

    /// Mark the filesystem administratively down.
    pub async fn mark_filesystem_down(&self, fs_name: &str) -> Result<()> {
        info!(fs = %fs_name, "Marking filesystem down");
        self.gateway
            .run(&args(&["fs", "set", fs_name, "cluster_down", "true"]))
            .await
            .with_context(|| format!("failed to set file system {} to cluster_down", fs_name))?;
        Ok(())
    }

    /// Mark the filesystem down and fail its daemons in one command.
    pub async fn fail_filesystem(&self, fs_name: &str) -> Result<()> {
        info!(fs = %fs_name, "Failing filesystem");
        self.gateway
            .run(&args(&["fs", "fail", fs_name]))
            .await
            .with_context(|| format!("failed to fail filesystem {}", fs_name))?;
        Ok(())
    }

    /// Remove a filesystem and, unless `preserve_pools` is set, its pools.
    pub async fn remove_filesystem(&self, fs_name: &str, preserve_pools: bool) -> Result<()> {
        // Pool ids are only readable while the filesystem still exists.
        let details = self
            .get_filesystem(fs_name)
            .await
            .with_context(|| format!("failed to get filesystem {} before removal", fs_name))?;

        info!(fs = %fs_name, preserve_pools, "Removing filesystem");
        self.gateway
            .run(&args(&["fs", "rm", fs_name, CONFIRM_FLAG]))
            .await
            .with_context(|| format!("failed to delete filesystem {}", fs_name))?;

        if preserve_pools {
            info!(fs = %fs_name, "Pools preserved on filesystem removal");
            return Ok(());
        }

        delete_filesystem_pools(self.pools.as_ref(), &details)
            .await
            .with_context(|| format!("failed to delete fs {} pools", fs_name))
    }

    async fn fail_mds(&self, gid: Gid) -> Result<()> {
        info!(gid, "Failing mds");
        let gid_str = gid.to_string();
        self.gateway
            .run(&args(&["mds", "fail", &gid_str]))
            .await
            .with_context(|| format!("failed to fail mds {}", gid))?;
        Ok(())
    }
}
