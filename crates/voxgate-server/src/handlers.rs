use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use http::HeaderMap;
use voxgate_core::Permission;
use voxgate_synthesis::{Orchestrator, SynthesisError, SynthesisOutput, SynthesizeRequest};

use crate::extract::{Payload, credential};
use crate::response::ApiError;

/// `POST /v1/synthesize` — audio bytes, streamed or buffered
pub async fn synthesize(
    State(orchestrator): State<Arc<Orchestrator>>,
    headers: HeaderMap,
    Payload(request): Payload<SynthesizeRequest>,
) -> Result<Response, ApiError> {
    let output = orchestrator.synthesize(credential(&headers), request).await?;

    let response = match output {
        SynthesisOutput::Streamed(streamed) => audio_response(
            &streamed.tenant_id,
            &streamed.voice_id,
            &streamed.content_type,
            true,
            Body::from_stream(streamed.stream),
        ),
        SynthesisOutput::Complete(payload) => audio_response(
            &payload.tenant_id,
            &payload.voice_id,
            &payload.content_type,
            false,
            Body::from(payload.bytes),
        ),
    }?;

    Ok(response)
}

/// `POST /v1/synthesize-url` — JSON envelope with a retrieval URL
pub async fn synthesize_url(
    State(orchestrator): State<Arc<Orchestrator>>,
    headers: HeaderMap,
    Payload(request): Payload<SynthesizeRequest>,
) -> Result<Response, ApiError> {
    let reply = orchestrator.synthesize_url(credential(&headers), request).await?;

    Ok(Json(reply).into_response())
}

/// `GET /v1/audio/{tenant_id}/{file_id}` — stored bytes (local strategy)
pub async fn audio_file(
    State(orchestrator): State<Arc<Orchestrator>>,
    headers: HeaderMap,
    Path((tenant_id, file_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let tenant = orchestrator.authenticate(credential(&headers)).await?;

    let bytes = orchestrator.open_audio(&tenant, &tenant_id, &file_id).await?;

    let response = Response::builder()
        .header(http::header::CONTENT_TYPE, content_type_for(&file_id))
        .body(Body::from(bytes))
        .map_err(|e| ApiError(SynthesisError::Internal(anyhow::anyhow!(e))))?;

    Ok(response)
}

/// `GET /v1/voices` — the tenant-visible voice catalog
pub async fn voices(
    State(orchestrator): State<Arc<Orchestrator>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let tenant = orchestrator
        .authenticate_request(credential(&headers), Permission::Voices)
        .await?;

    let voices = orchestrator.voices().await?;

    let body = serde_json::json!({
        "tenant_id": tenant.tenant_id,
        "voices": &*voices,
        "total_count": voices.len(),
    });

    Ok(Json(body).into_response())
}

/// `GET /v1/tenant/stats` — live window counters for the caller
pub async fn tenant_stats(
    State(orchestrator): State<Arc<Orchestrator>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let tenant = orchestrator.authenticate(credential(&headers)).await?;

    let usage = orchestrator.tenant_usage(&tenant).await;

    let body = serde_json::json!({
        "tenant_id": tenant.tenant_id,
        "name": tenant.name,
        "rate_limit": {
            "per_minute": tenant.rate_limit.per_minute,
            "per_hour": tenant.rate_limit.per_hour,
        },
        "usage": {
            "minute_count": usage.minute_count,
            "hour_count": usage.hour_count,
        },
        "storage_backend": orchestrator.storage_kind(),
    });

    Ok(Json(body).into_response())
}

fn audio_response(
    tenant_id: &str,
    voice_id: &str,
    content_type: &str,
    streaming: bool,
    body: Body,
) -> Result<Response, ApiError> {
    Response::builder()
        .header(http::header::CONTENT_TYPE, content_type)
        .header("x-tenant-id", tenant_id)
        .header("x-voice-id", voice_id)
        .header("x-streaming", if streaming { "true" } else { "false" })
        .body(body)
        .map_err(|e| ApiError(SynthesisError::Internal(anyhow::anyhow!(e))))
}

/// Derive a response content type from a stored file's extension
fn content_type_for(file_id: &str) -> &'static str {
    match file_id.rsplit('.').next() {
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        _ => "audio/wav",
    }
}
