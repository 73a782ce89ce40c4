use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;
use voxgate_config::RemoteStorageConfig;

use crate::{
    StorageKind,
    error::StorageError,
    object::{StoredAudio, new_file_id, validate_component},
};

/// Hosted object store with time-limited signed retrieval URLs
///
/// Uploads land under `{bucket}/{tenant_id}/{file_id}`; the signed URL
/// returned to the caller is the retrieval capability and needs no
/// further authentication.
pub struct RemoteStore {
    http: reqwest::Client,
    base_url: Url,
    service_key: SecretString,
    bucket: String,
    signed_url_expiry: u64,
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl RemoteStore {
    /// Probe the bucket and return the store
    ///
    /// A failed probe reports `Init` so the caller can degrade to the
    /// local strategy instead of crashing at startup.
    pub async fn connect(config: &RemoteStorageConfig) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| StorageError::Init(e.to_string()))?;

        let store = Self {
            http,
            base_url: config.url.clone(),
            service_key: config.service_key.clone(),
            bucket: config.bucket.clone(),
            signed_url_expiry: config.signed_url_expiry_seconds,
        };

        let probe = store.endpoint(&format!("storage/v1/bucket/{}", store.bucket))?;
        let response = store
            .http
            .get(probe)
            .bearer_auth(store.service_key.expose_secret())
            .send()
            .await
            .map_err(|e| StorageError::Init(format!("bucket probe failed: {e}")))?;

        if !response.status().is_success() {
            return Err(StorageError::Init(format!(
                "bucket '{}' not accessible (status {})",
                store.bucket,
                response.status()
            )));
        }

        tracing::info!(bucket = %store.bucket, "remote storage initialized");

        Ok(store)
    }

    /// Upload bytes and return a signed retrieval URL
    pub async fn save(&self, tenant_id: &str, content_type: &str, bytes: Vec<u8>) -> Result<StoredAudio, StorageError> {
        validate_component(tenant_id)?;

        let file_id = new_file_id(content_type);
        let byte_size = bytes.len() as u64;
        let object_path = format!("{tenant_id}/{file_id}");

        let upload = self.endpoint(&format!("storage/v1/object/{}/{object_path}", self.bucket))?;
        let response = self
            .http
            .post(upload)
            .bearer_auth(self.service_key.expose_secret())
            .header(http::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Upload(format!(
                "object store returned status {}",
                response.status()
            )));
        }

        let url = self.sign(&object_path).await?;

        Ok(StoredAudio {
            file_id,
            url,
            content_type: content_type.to_owned(),
            byte_size,
            backend: StorageKind::Remote,
        })
    }

    /// Request a time-limited signed URL for an uploaded object
    async fn sign(&self, object_path: &str) -> Result<String, StorageError> {
        let sign = self.endpoint(&format!("storage/v1/object/sign/{}/{object_path}", self.bucket))?;
        let response = self
            .http
            .post(sign)
            .bearer_auth(self.service_key.expose_secret())
            .json(&serde_json::json!({ "expiresIn": self.signed_url_expiry }))
            .send()
            .await
            .map_err(|e| StorageError::Sign(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Sign(format!(
                "signing endpoint returned status {}",
                response.status()
            )));
        }

        let signed: SignedUrlResponse = response.json().await.map_err(|e| StorageError::Sign(e.to_string()))?;

        // The store may answer with a path relative to its storage root
        if signed.signed_url.starts_with("http") {
            Ok(signed.signed_url)
        } else {
            let base = self.base_url.as_str().trim_end_matches('/');
            Ok(format!("{base}/storage/v1{}", signed.signed_url))
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, StorageError> {
        self.base_url
            .join(path)
            .map_err(|e| StorageError::Init(format!("invalid storage URL: {e}")))
    }
}
