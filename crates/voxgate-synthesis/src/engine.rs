mod http;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::types::Voice;

pub use self::http::HttpEngine;

/// Ordered, finite sequence of audio chunks from the engine
pub type AudioByteStream = BoxStream<'static, Result<bytes::Bytes, EngineError>>;

/// Errors from the external synthesis engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine does not know this voice
    #[error("voice not found: {0}")]
    UnknownVoice(String),

    /// The engine could not be reached
    #[error("failed to reach synthesis engine: {0}")]
    Connection(String),

    /// The engine answered with an error
    #[error("synthesis engine error ({status}): {message}")]
    Api {
        /// HTTP status from the engine
        status: u16,
        /// Error body from the engine
        message: String,
    },
}

/// Parameters for one synthesis dispatch
#[derive(Debug, Clone, serde::Serialize)]
pub struct SynthesisSpec {
    /// Text to speak (post-sanitization)
    pub text: String,
    /// Voice selector
    pub voice_id: String,
    /// Locale tag
    pub language: String,
}

/// Complete audio payload from a batch dispatch
pub struct EngineAudio {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Lazy chunk sequence from a streaming dispatch
pub struct EngineStream {
    pub chunks: AudioByteStream,
    pub content_type: String,
}

/// The external text-to-speech capability
///
/// Given text and a voice selection the engine produces audio bytes or
/// an audio byte stream, and exposes the voice catalog. Everything
/// behind this trait (model, codecs, cloning quality) is the engine's
/// concern, not the gateway's.
#[async_trait]
pub trait SynthesisEngine: Send + Sync {
    /// Produce the complete audio payload
    async fn synthesize(&self, spec: &SynthesisSpec) -> Result<EngineAudio, EngineError>;

    /// Produce audio as a lazy chunk stream
    async fn synthesize_stream(&self, spec: &SynthesisSpec) -> Result<EngineStream, EngineError>;

    /// List the available voices
    async fn voices(&self) -> Result<Vec<Voice>, EngineError>;
}
