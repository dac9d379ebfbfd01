//! mdsctl - lifecycle management for a distributed filesystem's metadata-service cluster.
//!
//! mdsctl drives filesystems and their metadata daemons (MDS) on a storage
//! cluster administered through a JSON-speaking command-line tool. It holds
//! no state: every call observes the cluster afresh through the admin tool.
//!
//! # Features
//!
//! - **Lifecycle**: create, scale, fail over and remove filesystems.
//! - **Rank Resolution**: map ranks to daemons and find standby-replay daemons.
//! - **Convergence Waits**: bounded, cancellable polling for rank counts and
//!   standby draining.
//! - **Pool Cleanup**: delete a removed filesystem's pools, best effort.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  FilesystemManager: create | scale | fail | remove          │
//! ├──────────────────────────────┬──────────────────────────────┤
//! │  Poller: bounded waits       │  Resolver: ranks | standbys  │
//! ├──────────────────────────────┴──────────────────────────────┤
//! │  CommandGateway (admin tool)  |  PoolCatalog (ids, delete)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use mdsctl::command::{CommandGateway, ProcessGateway};
//! use mdsctl::config::MdsConfig;
//! use mdsctl::mds::FilesystemManager;
//! use mdsctl::pool::CommandPoolCatalog;
//! use mdsctl::version::ClusterVersion;
//!
//! #[tokio::main]
//! async fn main() -> mdsctl::Result<()> {
//!     let config = MdsConfig::default();
//!     mdsctl::observability::init(&config.observability)?;
//!
//!     let gateway: Arc<dyn CommandGateway> = Arc::new(ProcessGateway::new(config.command.clone()));
//!     let pools = Arc::new(CommandPoolCatalog::new(gateway.clone()));
//!     let manager = FilesystemManager::new(gateway, pools, "18.2.1".parse::<ClusterVersion>()?)
//!         .with_wait_config(config.wait.clone());
//!
//!     manager.create_filesystem("myfs", "myfs-metadata", &["myfs-data0"]).await?;
//!     manager.set_num_mds_ranks("myfs", 2).await?;
//!     manager.wait_for_active_ranks_default("myfs", 2, false).await?;
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod command;
pub mod config;
pub mod error;
pub mod mds;
pub mod observability;
pub mod pool;
pub mod version;

// Re-exports
pub use cancel::CancelToken;
pub use error::{MdsError, Result};
pub use mds::FilesystemManager;
pub use version::ClusterVersion;
