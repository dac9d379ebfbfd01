//! Deletion of the pools backing a removed filesystem.

use super::types::{FilesystemDetails, PoolId};
use crate::error::{MdsError, Result};
use crate::pool::PoolCatalog;
use std::collections::HashMap;
use tracing::{info, warn};

/// Delete the metadata pool and every data pool named in `details`.
///
/// Every pool is attempted even when an earlier one fails. Only the last
/// failure is returned; earlier ones are logged.
pub async fn delete_filesystem_pools(
    catalog: &dyn PoolCatalog,
    details: &FilesystemDetails,
) -> Result<()> {
    let pool_names = catalog
        .pool_names_by_id()
        .await
        .map_err(|e| e.context("failed to get pool names"))?;

    let map = &details.mds_map;
    let ids = std::iter::once(map.metadata_pool).chain(map.data_pools.iter().copied());

    let mut last_err = None;
    for id in ids {
        if let Err(e) = delete_pool_by_id(catalog, &pool_names, id).await {
            warn!(fs = %map.filesystem_name, pool_id = id, error = %e, "Failed to delete filesystem pool");
            last_err = Some(e);
        }
    }

    match last_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

async fn delete_pool_by_id(
    catalog: &dyn PoolCatalog,
    pool_names: &HashMap<PoolId, String>,
    id: PoolId,
) -> Result<()> {
    let name = pool_names
        .get(&id)
        .ok_or_else(|| MdsError::NotFound(format!("pool {}", id)))?;
    catalog.delete_pool(name).await?;
    info!(pool = %name, pool_id = id, "Deleted filesystem pool");
    Ok(())
}
