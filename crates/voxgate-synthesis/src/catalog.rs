use std::sync::Arc;
use std::time::Duration;

use mini_moka::sync::Cache;

use crate::{
    engine::{EngineError, SynthesisEngine},
    types::Voice,
};

const CATALOG_KEY: &str = "catalog";

/// Cached view of the engine's voice catalog
///
/// The catalog is configuration-shaped data: repeated reads return the
/// same content, so a short TTL cache keeps `GET /voices` and
/// per-request voice validation off the engine's hot path.
#[derive(Clone)]
pub struct VoiceCatalog {
    engine: Arc<dyn SynthesisEngine>,
    cache: Cache<&'static str, Arc<Vec<Voice>>>,
}

impl VoiceCatalog {
    /// Create a catalog over the given engine
    #[must_use]
    pub fn new(engine: Arc<dyn SynthesisEngine>, ttl: Duration) -> Self {
        let cache = Cache::builder().time_to_live(ttl).max_capacity(1).build();

        Self { engine, cache }
    }

    /// List the available voices
    pub async fn list(&self) -> Result<Arc<Vec<Voice>>, EngineError> {
        if let Some(cached) = self.cache.get(&CATALOG_KEY) {
            return Ok(cached);
        }

        let voices = Arc::new(self.engine.voices().await?);
        self.cache.insert(CATALOG_KEY, Arc::clone(&voices));

        Ok(voices)
    }

    /// Whether the catalog knows this voice
    pub async fn contains(&self, voice_id: &str) -> Result<bool, EngineError> {
        let voices = self.list().await?;
        Ok(voices.iter().any(|voice| voice.voice_id == voice_id))
    }
}
