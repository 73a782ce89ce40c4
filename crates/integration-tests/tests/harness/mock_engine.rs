//! Mock synthesis engine for integration tests
//!
//! Implements the engine's JSON API with canned WAV-ish payloads and
//! per-endpoint call counters.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Canned audio payload returned by the mock
pub const WAV_BYTES: &[u8] = b"RIFF0000WAVEfmt mock-audio-data";

/// Voices the mock engine knows
const VOICES: &[(&str, &str)] = &[
    ("default", "Default Voice"),
    ("naija_female", "Nigerian Female"),
    ("naija_male", "Nigerian Male"),
];

/// Mock engine backend with predictable responses
pub struct MockEngine {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockEngineState>,
}

struct MockEngineState {
    synthesize_count: AtomicU32,
    voices_count: AtomicU32,
    /// Number of synthesize requests to fail with 500 before succeeding
    fail_count: AtomicU32,
}

#[derive(Debug, Deserialize)]
struct EngineRequest {
    text: String,
    voice_id: String,
    #[allow(dead_code)]
    language: String,
    streaming: bool,
}

impl MockEngine {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(0).await
    }

    /// Start a mock server that fails the first `n` requests with 500
    pub async fn start_failing(n: u32) -> anyhow::Result<Self> {
        Self::start_inner(n).await
    }

    async fn start_inner(fail_count: u32) -> anyhow::Result<Self> {
        let state = Arc::new(MockEngineState {
            synthesize_count: AtomicU32::new(0),
            voices_count: AtomicU32::new(0),
            fail_count: AtomicU32::new(fail_count),
        });

        let app = Router::new()
            .route("/synthesize", routing::post(handle_synthesize))
            .route("/voices", routing::get(handle_voices))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            shutdown,
            state,
        })
    }

    /// Base URL of the mock engine
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Number of synthesize dispatches received
    pub fn synthesize_count(&self) -> u32 {
        self.state.synthesize_count.load(Ordering::SeqCst)
    }

    /// Number of catalog reads received
    pub fn voices_count(&self) -> u32 {
        self.state.voices_count.load(Ordering::SeqCst)
    }
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_synthesize(
    State(state): State<Arc<MockEngineState>>,
    Json(request): Json<EngineRequest>,
) -> axum::response::Response {
    state.synthesize_count.fetch_add(1, Ordering::SeqCst);

    if state
        .fail_count
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
    {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model error").into_response();
    }

    if request.text.is_empty() {
        return (StatusCode::BAD_REQUEST, "empty text").into_response();
    }

    if !VOICES.iter().any(|(id, _)| *id == request.voice_id) {
        return (StatusCode::NOT_FOUND, "voice not found").into_response();
    }

    if request.streaming {
        let chunks = vec![
            Ok::<_, std::io::Error>(bytes::Bytes::from_static(&WAV_BYTES[..16])),
            Ok(bytes::Bytes::from_static(&WAV_BYTES[16..])),
        ];
        let body = axum::body::Body::from_stream(futures_util::stream::iter(chunks));

        axum::response::Response::builder()
            .header(axum::http::header::CONTENT_TYPE, "audio/wav")
            .body(body)
            .unwrap()
    } else {
        ([(axum::http::header::CONTENT_TYPE, "audio/wav")], WAV_BYTES).into_response()
    }
}

async fn handle_voices(State(state): State<Arc<MockEngineState>>) -> axum::response::Response {
    state.voices_count.fetch_add(1, Ordering::SeqCst);

    let voices: Vec<_> = VOICES
        .iter()
        .map(|(voice_id, name)| {
            serde_json::json!({
                "voice_id": voice_id,
                "name": name,
                "language": "en",
            })
        })
        .collect();

    Json(voices).into_response()
}
