use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use secrecy::{ExposeSecret, SecretString};
use url::Url;
use voxgate_config::EngineConfig;

use super::{AudioByteStream, EngineAudio, EngineError, EngineStream, SynthesisEngine, SynthesisSpec};
use crate::types::Voice;

const DEFAULT_CONTENT_TYPE: &str = "audio/wav";

/// HTTP-backed synthesis engine client
///
/// Talks to the engine service over its JSON API: `POST /synthesize`
/// for audio (buffered or chunked) and `GET /voices` for the catalog.
pub struct HttpEngine {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

#[derive(serde::Serialize)]
struct EngineRequest<'a> {
    text: &'a str,
    voice_id: &'a str,
    language: &'a str,
    streaming: bool,
}

impl HttpEngine {
    /// Build the engine client from configuration
    pub fn new(config: &EngineConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn dispatch(&self, spec: &SynthesisSpec, streaming: bool) -> Result<reqwest::Response, EngineError> {
        let url = self
            .base_url
            .join("synthesize")
            .map_err(|e| EngineError::Connection(e.to_string()))?;

        let body = EngineRequest {
            text: &spec.text,
            voice_id: &spec.voice_id,
            language: &spec.language,
            streaming,
        };

        let mut request = self.client.post(url).json(&body);
        if let Some(ref api_key) = self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "synthesis engine request failed");
            EngineError::Connection(e.to_string())
        })?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());

            tracing::error!(%status, %message, "synthesis engine returned an error");

            return Err(match status.as_u16() {
                404 => EngineError::UnknownVoice(spec.voice_id.clone()),
                _ => EngineError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl SynthesisEngine for HttpEngine {
    async fn synthesize(&self, spec: &SynthesisSpec) -> Result<EngineAudio, EngineError> {
        tracing::debug!(
            voice_id = %spec.voice_id,
            input_len = spec.text.len(),
            "dispatching batch synthesis"
        );

        let response = self.dispatch(spec, false).await?;
        let content_type = content_type_of(&response);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| EngineError::Connection(format!("failed to read audio body: {e}")))?;

        tracing::debug!(bytes = bytes.len(), "batch synthesis complete");

        Ok(EngineAudio {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    async fn synthesize_stream(&self, spec: &SynthesisSpec) -> Result<EngineStream, EngineError> {
        tracing::debug!(
            voice_id = %spec.voice_id,
            input_len = spec.text.len(),
            "dispatching streaming synthesis"
        );

        let response = self.dispatch(spec, true).await?;
        let content_type = content_type_of(&response);

        let chunks: AudioByteStream = Box::pin(
            response
                .bytes_stream()
                .map_err(|e| EngineError::Connection(format!("stream interrupted: {e}"))),
        );

        Ok(EngineStream { chunks, content_type })
    }

    async fn voices(&self) -> Result<Vec<Voice>, EngineError> {
        let url = self
            .base_url
            .join("voices")
            .map_err(|e| EngineError::Connection(e.to_string()))?;

        let mut request = self.client.get(url);
        if let Some(ref api_key) = self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| EngineError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(EngineError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| EngineError::Connection(format!("failed to parse voice catalog: {e}")))
    }
}

fn content_type_of(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}
