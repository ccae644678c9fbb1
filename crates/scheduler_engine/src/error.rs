use scheduler_core::SyncError;
use thiserror::Error;

use crate::persist::PersistError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no events to export: {0}")]
    NothingToExport(String),
    #[error("failed to deliver {filename}: {source}")]
    Delivery {
        filename: String,
        #[source]
        source: PersistError,
    },
}
