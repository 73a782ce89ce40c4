#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod catalog;
mod engine;
mod error;
mod orchestrator;
pub mod ssml;
mod stream;
mod types;

pub use catalog::VoiceCatalog;
pub use engine::{AudioByteStream, EngineAudio, EngineError, EngineStream, HttpEngine, SynthesisEngine, SynthesisSpec};
pub use error::SynthesisError;
pub use orchestrator::Orchestrator;
pub use stream::AudioStream;
pub use types::{AudioPayload, StoredAudioReply, StreamingAudio, SynthesisOutput, SynthesizeRequest, Voice};
