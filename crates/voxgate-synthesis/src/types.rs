use serde::{Deserialize, Serialize};
use voxgate_storage::StorageKind;

use crate::stream::AudioStream;

/// Inbound synthesis request body
///
/// Voice and language fall back to configured defaults when absent.
/// When `ssml` is present its sanitized text replaces `text` for
/// dispatch; `text` itself still gates validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynthesizeRequest {
    /// Text to synthesize
    pub text: String,
    /// Voice selector into the engine's catalog
    #[serde(default)]
    pub voice_id: Option<String>,
    /// Locale tag
    #[serde(default)]
    pub language: Option<String>,
    /// Optional markup, sanitized before dispatch
    #[serde(default)]
    pub ssml: Option<String>,
    /// Whether to stream the response
    #[serde(default = "default_streaming")]
    pub streaming: bool,
}

#[allow(clippy::missing_const_for_fn)]
fn default_streaming() -> bool {
    true
}

/// One entry in the tenant-visible voice catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    /// Voice selector
    pub voice_id: String,
    /// Display name
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Language the voice speaks
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

/// Successful synthesis response shape
#[derive(Debug)]
pub enum SynthesisOutput {
    /// Audio relayed chunk by chunk as the engine produces it
    Streamed(StreamingAudio),
    /// Complete audio payload in one buffer
    Complete(AudioPayload),
}

/// A live audio stream and its response metadata
#[derive(Debug)]
pub struct StreamingAudio {
    pub tenant_id: String,
    pub voice_id: String,
    pub content_type: String,
    pub stream: AudioStream,
}

/// A fully-buffered audio payload and its response metadata
#[derive(Debug)]
pub struct AudioPayload {
    pub tenant_id: String,
    pub voice_id: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Response envelope for URL-mode synthesis
#[derive(Debug, Clone, Serialize)]
pub struct StoredAudioReply {
    pub tenant_id: String,
    pub voice_id: String,
    /// Signed URL (remote) or gateway retrieval path (local)
    pub url: String,
    pub content_type: String,
    pub storage_backend: StorageKind,
}
