use std::path::PathBuf;

use voxgate_config::LocalStorageConfig;

use crate::{
    StorageKind,
    error::StorageError,
    object::{StoredAudio, new_file_id, validate_component},
};

/// Local filesystem storage with tenant-namespaced subdirectories
///
/// Returned paths are gateway-relative and only retrievable through
/// the authenticated retrieval endpoint; combining with a configured
/// public base is left to deployments fronted by one.
pub struct LocalStore {
    root: PathBuf,
    public_base: Option<String>,
}

impl LocalStore {
    /// Create the root directory and return the store
    pub fn init(config: &LocalStorageConfig) -> Result<Self, StorageError> {
        std::fs::create_dir_all(&config.root)?;

        tracing::info!(root = %config.root.display(), "local storage initialized");

        Ok(Self {
            root: config.root.clone(),
            public_base: config.public_base_url.clone(),
        })
    }

    /// Write bytes under `{root}/{tenant_id}/{file_id}`
    pub async fn save(&self, tenant_id: &str, content_type: &str, bytes: Vec<u8>) -> Result<StoredAudio, StorageError> {
        validate_component(tenant_id)?;

        let file_id = new_file_id(content_type);
        let byte_size = bytes.len() as u64;

        let tenant_dir = self.root.join(tenant_id);
        tokio::fs::create_dir_all(&tenant_dir).await?;
        tokio::fs::write(tenant_dir.join(&file_id), bytes).await?;

        let relative = format!("/v1/audio/{tenant_id}/{file_id}");
        let url = self
            .public_base
            .as_ref()
            .map_or_else(|| relative.clone(), |base| format!("{}{relative}", base.trim_end_matches('/')));

        Ok(StoredAudio {
            file_id,
            url,
            content_type: content_type.to_owned(),
            byte_size,
            backend: StorageKind::Local,
        })
    }

    /// Read a stored object's bytes
    pub async fn open(&self, tenant_id: &str, file_id: &str) -> Result<Vec<u8>, StorageError> {
        validate_component(tenant_id)?;
        validate_component(file_id)?;

        let path = self.root.join(tenant_id).join(file_id);

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir, public_base: Option<&str>) -> LocalStore {
        LocalStore::init(&LocalStorageConfig {
            root: dir.path().to_path_buf(),
            public_base_url: public_base.map(str::to_owned),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn save_then_open_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, None);

        let saved = store.save("t1", "audio/wav", b"RIFFdata".to_vec()).await.unwrap();
        assert_eq!(saved.byte_size, 8);
        assert_eq!(saved.url, format!("/v1/audio/t1/{}", saved.file_id));

        let bytes = store.open("t1", &saved.file_id).await.unwrap();
        assert_eq!(bytes, b"RIFFdata");
    }

    #[tokio::test]
    async fn wrong_tenant_never_sees_the_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, None);

        let saved = store.save("t1", "audio/wav", b"RIFFdata".to_vec()).await.unwrap();

        let err = store.open("t2", &saved.file_id).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, None);

        assert!(matches!(
            store.open("t1", "../t2-secret.wav").await.unwrap_err(),
            StorageError::InvalidKey(_)
        ));
        assert!(matches!(
            store.save("../etc", "audio/wav", Vec::new()).await.unwrap_err(),
            StorageError::InvalidKey(_)
        ));
    }

    #[tokio::test]
    async fn public_base_is_prepended() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, Some("https://cdn.example.com/"));

        let saved = store.save("t1", "audio/wav", b"x".to_vec()).await.unwrap();
        assert!(saved.url.starts_with("https://cdn.example.com/v1/audio/t1/"));
    }
}
