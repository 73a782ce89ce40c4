#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod error;
mod local;
mod object;
mod remote;

pub use error::StorageError;
pub use local::LocalStore;
pub use object::StoredAudio;
pub use remote::RemoteStore;

use serde::Serialize;
use voxgate_config::{StorageConfig, StorageStrategy};

/// Which strategy persisted an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Hosted object store with signed retrieval URLs
    Remote,
    /// Tenant-namespaced files under a local root
    Local,
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote => f.write_str("remote"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// Audio storage backend selected by configuration
///
/// Objects are namespaced by tenant under both strategies, so no
/// tenant can address another tenant's object by guessing an id.
pub enum AudioStore {
    Remote(RemoteStore),
    Local(LocalStore),
}

impl AudioStore {
    /// Initialize the configured strategy
    ///
    /// A remote strategy that fails to initialize degrades to the
    /// local strategy with a single warning instead of crashing.
    pub async fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        match (config.strategy, &config.remote) {
            (StorageStrategy::Remote, Some(remote_config)) => match RemoteStore::connect(remote_config).await {
                Ok(store) => Ok(Self::Remote(store)),
                Err(e) => {
                    tracing::warn!(error = %e, "remote storage unavailable, falling back to local");
                    LocalStore::init(&config.local).map(Self::Local)
                }
            },
            (StorageStrategy::Remote, None) => {
                tracing::warn!("remote storage selected but not configured, falling back to local");
                LocalStore::init(&config.local).map(Self::Local)
            }
            (StorageStrategy::Local, _) => LocalStore::init(&config.local).map(Self::Local),
        }
    }

    /// Persist audio bytes under a fresh tenant-scoped object id
    pub async fn save(&self, tenant_id: &str, content_type: &str, bytes: Vec<u8>) -> Result<StoredAudio, StorageError> {
        match self {
            Self::Remote(store) => store.save(tenant_id, content_type, bytes).await,
            Self::Local(store) => store.save(tenant_id, content_type, bytes).await,
        }
    }

    /// Read a stored object's bytes (local strategy only)
    pub async fn open(&self, tenant_id: &str, file_id: &str) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::Remote(_) => Err(StorageError::SignedOnly),
            Self::Local(store) => store.open(tenant_id, file_id).await,
        }
    }

    /// Which strategy this store runs
    pub const fn kind(&self) -> StorageKind {
        match self {
            Self::Remote(_) => StorageKind::Remote,
            Self::Local(_) => StorageKind::Local,
        }
    }
}
