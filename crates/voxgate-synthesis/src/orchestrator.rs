use std::sync::Arc;
use std::time::{Duration, Instant};

use voxgate_auth::AuthGate;
use voxgate_config::EngineConfig;
use voxgate_core::{Permission, TenantContext};
use voxgate_ratelimit::{TenantLimiter, WindowUsage};
use voxgate_storage::{AudioStore, StorageError, StorageKind};
use voxgate_usage::{SENTINEL_TENANT, UsageRecord, UsageRecorder};

use crate::{
    catalog::VoiceCatalog,
    engine::{SynthesisEngine, SynthesisSpec},
    error::SynthesisError,
    ssml,
    stream::AudioStream,
    types::{AudioPayload, StoredAudioReply, StreamingAudio, SynthesisOutput, SynthesizeRequest, Voice},
};

const ENDPOINT_SYNTHESIZE: &str = "synthesize";
const ENDPOINT_SYNTHESIZE_URL: &str = "synthesize-url";

/// Top-level coordinator for the synthesis request lifecycle
///
/// Every request walks the same admission pipeline: validate,
/// authenticate, admit, dispatch, shape the response, record usage.
/// Failures short-circuit to the usage record whenever a tenant (or
/// the sentinel) is known; the recorder itself is never awaited.
pub struct Orchestrator {
    gate: AuthGate,
    limiter: TenantLimiter,
    engine: Arc<dyn SynthesisEngine>,
    store: AudioStore,
    catalog: VoiceCatalog,
    recorder: UsageRecorder,
    max_text_chars: usize,
    default_language: String,
    default_voice: String,
}

/// A request that survived validation, ready for dispatch
struct Prepared {
    spec: SynthesisSpec,
    input_chars: u64,
}

impl Orchestrator {
    /// Assemble the orchestrator from its collaborators
    pub fn new(
        gate: AuthGate,
        limiter: TenantLimiter,
        engine: Arc<dyn SynthesisEngine>,
        store: AudioStore,
        recorder: UsageRecorder,
        config: &EngineConfig,
    ) -> Self {
        let catalog = VoiceCatalog::new(Arc::clone(&engine), Duration::from_secs(config.catalog_ttl_seconds));

        Self {
            gate,
            limiter,
            engine,
            store,
            catalog,
            recorder,
            max_text_chars: config.max_text_chars,
            default_language: config.default_language.clone(),
            default_voice: config.default_voice.clone(),
        }
    }

    /// Synthesize audio, streamed or buffered per the request
    pub async fn synthesize(
        &self,
        credential: Option<&str>,
        request: SynthesizeRequest,
    ) -> Result<SynthesisOutput, SynthesisError> {
        let streaming = request.streaming;
        let prepared = self.validate(&request).await?;
        let tenant = self
            .authenticate_synthesis(credential, &prepared, ENDPOINT_SYNTHESIZE, streaming)
            .await?;
        let started = self.admit(&tenant, &prepared, ENDPOINT_SYNTHESIZE, streaming).await?;

        if streaming {
            match self.engine.synthesize_stream(&prepared.spec).await {
                Ok(engine_stream) => {
                    let draft = self.draft_record(&tenant.tenant_id, &prepared, ENDPOINT_SYNTHESIZE, true);

                    Ok(SynthesisOutput::Streamed(StreamingAudio {
                        tenant_id: tenant.tenant_id,
                        voice_id: prepared.spec.voice_id,
                        content_type: engine_stream.content_type,
                        stream: AudioStream::new(engine_stream.chunks, self.recorder.clone(), draft, started),
                    }))
                }
                Err(e) => {
                    let err = SynthesisError::from(e);
                    self.record_failure(
                        &tenant.tenant_id,
                        &prepared,
                        ENDPOINT_SYNTHESIZE,
                        true,
                        elapsed_ms(started),
                        &err,
                    );
                    Err(err)
                }
            }
        } else {
            match self.engine.synthesize(&prepared.spec).await {
                Ok(audio) => {
                    let mut record = self.draft_record(&tenant.tenant_id, &prepared, ENDPOINT_SYNTHESIZE, false);
                    record.audio_bytes = audio.bytes.len() as u64;
                    record.latency_ms = elapsed_ms(started);
                    self.recorder.record(record);

                    Ok(SynthesisOutput::Complete(AudioPayload {
                        tenant_id: tenant.tenant_id,
                        voice_id: prepared.spec.voice_id,
                        content_type: audio.content_type,
                        bytes: audio.bytes,
                    }))
                }
                Err(e) => {
                    let err = SynthesisError::from(e);
                    self.record_failure(
                        &tenant.tenant_id,
                        &prepared,
                        ENDPOINT_SYNTHESIZE,
                        false,
                        elapsed_ms(started),
                        &err,
                    );
                    Err(err)
                }
            }
        }
    }

    /// Synthesize audio, persist it, and return a retrieval URL
    pub async fn synthesize_url(
        &self,
        credential: Option<&str>,
        request: SynthesizeRequest,
    ) -> Result<StoredAudioReply, SynthesisError> {
        let prepared = self.validate(&request).await?;
        let tenant = self
            .authenticate_synthesis(credential, &prepared, ENDPOINT_SYNTHESIZE_URL, false)
            .await?;
        let started = self.admit(&tenant, &prepared, ENDPOINT_SYNTHESIZE_URL, false).await?;

        let audio = match self.engine.synthesize(&prepared.spec).await {
            Ok(audio) => audio,
            Err(e) => {
                let err = SynthesisError::from(e);
                self.record_failure(
                    &tenant.tenant_id,
                    &prepared,
                    ENDPOINT_SYNTHESIZE_URL,
                    false,
                    elapsed_ms(started),
                    &err,
                );
                return Err(err);
            }
        };

        let stored = match self.store.save(&tenant.tenant_id, &audio.content_type, audio.bytes).await {
            Ok(stored) => stored,
            Err(e) => {
                // Audio was generated but is not retrievable; keep the
                // storage kind distinct from a synthesis failure
                let err = SynthesisError::Storage(e);
                self.record_failure(
                    &tenant.tenant_id,
                    &prepared,
                    ENDPOINT_SYNTHESIZE_URL,
                    false,
                    elapsed_ms(started),
                    &err,
                );
                return Err(err);
            }
        };

        let mut record = self.draft_record(&tenant.tenant_id, &prepared, ENDPOINT_SYNTHESIZE_URL, false);
        record.request_id = stored.file_id.clone();
        record.audio_bytes = stored.byte_size;
        record.latency_ms = elapsed_ms(started);
        self.recorder.record(record);

        Ok(StoredAudioReply {
            tenant_id: tenant.tenant_id,
            voice_id: prepared.spec.voice_id,
            url: stored.url,
            content_type: stored.content_type,
            storage_backend: stored.backend,
        })
    }

    /// Authenticate a credential without a capability requirement
    pub async fn authenticate(&self, credential: Option<&str>) -> Result<TenantContext, SynthesisError> {
        self.gate.authenticate(credential).await.map_err(Into::into)
    }

    /// Authenticate a credential for a non-synthesis endpoint
    pub async fn authenticate_request(
        &self,
        credential: Option<&str>,
        permission: Permission,
    ) -> Result<TenantContext, SynthesisError> {
        let tenant = self.gate.authenticate(credential).await?;

        if !tenant.has_permission(permission) {
            return Err(SynthesisError::PermissionDenied { permission });
        }

        Ok(tenant)
    }

    /// Tenant-visible voice catalog
    pub async fn voices(&self) -> Result<Arc<Vec<Voice>>, SynthesisError> {
        self.catalog.list().await.map_err(Into::into)
    }

    /// Current window counters for the calling tenant
    pub async fn tenant_usage(&self, tenant: &TenantContext) -> WindowUsage {
        self.limiter.usage(&tenant.tenant_id).await
    }

    /// Read a stored object for the calling tenant (local strategy)
    pub async fn open_audio(
        &self,
        tenant: &TenantContext,
        tenant_id: &str,
        file_id: &str,
    ) -> Result<Vec<u8>, SynthesisError> {
        if tenant.tenant_id != tenant_id {
            // Cross-tenant ids never reveal whether the object exists
            return Err(StorageError::NotFound.into());
        }

        self.store.open(tenant_id, file_id).await.map_err(Into::into)
    }

    /// Which storage strategy is active
    pub const fn storage_kind(&self) -> StorageKind {
        self.store.kind()
    }

    /// Validate the request and prepare the dispatch spec
    ///
    /// Runs before authentication: a client error must never consume
    /// auth or admission work.
    async fn validate(&self, request: &SynthesizeRequest) -> Result<Prepared, SynthesisError> {
        if request.text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        if request.text.chars().count() > self.max_text_chars {
            return Err(SynthesisError::TextTooLong {
                max: self.max_text_chars,
            });
        }

        let text = request
            .ssml
            .as_deref()
            .map_or_else(|| request.text.clone(), ssml::sanitize);

        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        let voice_id = request
            .voice_id
            .clone()
            .unwrap_or_else(|| self.default_voice.clone());
        let language = request
            .language
            .clone()
            .unwrap_or_else(|| self.default_language.clone());

        match self.catalog.contains(&voice_id).await {
            Ok(true) => {}
            Ok(false) => return Err(SynthesisError::UnknownVoice { voice_id }),
            Err(e) => {
                tracing::warn!(error = %e, "voice catalog unavailable, deferring voice validation to the engine");
            }
        }

        let input_chars = text.chars().count() as u64;

        Ok(Prepared {
            spec: SynthesisSpec {
                text,
                voice_id,
                language,
            },
            input_chars,
        })
    }

    /// Resolve the tenant, recording rejections under the sentinel
    async fn authenticate_synthesis(
        &self,
        credential: Option<&str>,
        prepared: &Prepared,
        endpoint: &str,
        streaming: bool,
    ) -> Result<TenantContext, SynthesisError> {
        let tenant = match self.gate.authenticate(credential).await {
            Ok(tenant) => tenant,
            Err(e) => {
                let err = SynthesisError::from(e);
                self.record_failure(SENTINEL_TENANT, prepared, endpoint, streaming, 0, &err);
                return Err(err);
            }
        };

        if !tenant.has_permission(Permission::Synthesize) {
            let err = SynthesisError::PermissionDenied {
                permission: Permission::Synthesize,
            };
            self.record_failure(&tenant.tenant_id, prepared, endpoint, streaming, 0, &err);
            return Err(err);
        }

        Ok(tenant)
    }

    /// Ask the limiter for admission; the latency clock starts here
    async fn admit(
        &self,
        tenant: &TenantContext,
        prepared: &Prepared,
        endpoint: &str,
        streaming: bool,
    ) -> Result<Instant, SynthesisError> {
        if let Err(e) = self.limiter.admit(tenant).await {
            let err = SynthesisError::from(e);
            self.record_failure(&tenant.tenant_id, prepared, endpoint, streaming, 0, &err);
            return Err(err);
        }

        Ok(Instant::now())
    }

    fn draft_record(&self, tenant_id: &str, prepared: &Prepared, endpoint: &str, streaming: bool) -> UsageRecord {
        UsageRecord {
            tenant_id: tenant_id.to_owned(),
            request_id: uuid::Uuid::new_v4().to_string(),
            input_chars: prepared.input_chars,
            audio_bytes: 0,
            latency_ms: 0,
            streaming,
            voice_id: prepared.spec.voice_id.clone(),
            language: prepared.spec.language.clone(),
            endpoint: endpoint.to_owned(),
            error: None,
        }
    }

    fn record_failure(
        &self,
        tenant_id: &str,
        prepared: &Prepared,
        endpoint: &str,
        streaming: bool,
        latency_ms: u64,
        error: &SynthesisError,
    ) {
        let mut record = self.draft_record(tenant_id, prepared, endpoint, streaming);
        record.latency_ms = latency_ms;
        record.error = Some(error.to_string());
        self.recorder.record(record);
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
