//! Storage pool catalog.
//!
//! Filesystem metadata refers to pools by numeric id, while pool deletion
//! works by name. A [`PoolCatalog`] provides both the id-to-name lookup and
//! the deletion; [`CommandPoolCatalog`] implements it with admin commands.

use crate::command::{args, CommandGateway};
use crate::error::{MdsError, Result, ResultExt};
use crate::mds::types::PoolId;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Confirmation marker required to delete a pool.
pub const POOL_DELETE_CONFIRM_FLAG: &str = "--yes-i-really-really-mean-it";

/// Pool lookup and deletion.
#[async_trait]
pub trait PoolCatalog: Send + Sync {
    /// Names of all pools, keyed by id.
    async fn pool_names_by_id(&self) -> Result<HashMap<PoolId, String>>;

    /// Delete a pool by name.
    async fn delete_pool(&self, name: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct PoolEntry {
    #[serde(rename = "poolnum")]
    id: PoolId,
    #[serde(rename = "poolname")]
    name: String,
}

/// Pool catalog backed by admin commands.
pub struct CommandPoolCatalog {
    gateway: Arc<dyn CommandGateway>,
}

impl CommandPoolCatalog {
    /// Create a new command-backed catalog.
    pub fn new(gateway: Arc<dyn CommandGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl PoolCatalog for CommandPoolCatalog {
    async fn pool_names_by_id(&self) -> Result<HashMap<PoolId, String>> {
        let buf = self
            .gateway
            .run(&args(&["osd", "lspools"]))
            .await
            .with_context(|| "failed to list pools")?;

        let pools: Vec<PoolEntry> = serde_json::from_slice(&buf).map_err(|e| {
            MdsError::Parse(format!(
                "failed to unmarshal pool list {}: {}",
                String::from_utf8_lossy(&buf),
                e
            ))
        })?;

        Ok(pools.into_iter().map(|p| (p.id, p.name)).collect())
    }

    async fn delete_pool(&self, name: &str) -> Result<()> {
        info!(pool = %name, "Deleting pool");
        self.gateway
            .run(&args(&[
                "osd",
                "pool",
                "delete",
                name,
                name,
                POOL_DELETE_CONFIRM_FLAG,
            ]))
            .await
            .with_context(|| format!("failed to delete pool {:?}", name))?;
        Ok(())
    }
}
