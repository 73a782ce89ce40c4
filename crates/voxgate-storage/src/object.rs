use crate::{StorageKind, error::StorageError};

/// A persisted synthesis artifact and its retrieval descriptor
#[derive(Debug, Clone)]
pub struct StoredAudio {
    /// Unique object id within the tenant namespace
    pub file_id: String,
    /// Retrieval URL (signed for remote, gateway-relative for local)
    pub url: String,
    /// MIME type of the stored bytes
    pub content_type: String,
    /// Size of the stored object
    pub byte_size: u64,
    /// Strategy that persisted the object
    pub backend: StorageKind,
}

/// Validate one path component of an object key
///
/// Tenant ids and file ids become path segments under both strategies,
/// so traversal sequences and separators are rejected outright.
pub(crate) fn validate_component(value: &str) -> Result<(), StorageError> {
    if value.is_empty() {
        return Err(StorageError::InvalidKey("empty key component".to_owned()));
    }

    if value.starts_with('.') || value.contains("..") {
        return Err(StorageError::InvalidKey(format!("traversal sequence in '{value}'")));
    }

    if !value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.') {
        return Err(StorageError::InvalidKey(format!("unsupported characters in '{value}'")));
    }

    Ok(())
}

/// Generate a fresh object id for the given content type
pub(crate) fn new_file_id(content_type: &str) -> String {
    format!("{}.{}", uuid::Uuid::new_v4().simple(), extension_for(content_type))
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/mpeg" => "mp3",
        "audio/ogg" => "ogg",
        "audio/flac" => "flac",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_components_pass() {
        validate_component("tenant_abc").unwrap();
        validate_component("5f2c-audio.wav").unwrap();
    }

    #[test]
    fn separators_are_rejected() {
        assert!(validate_component("a/b").is_err());
        assert!(validate_component("a\\b").is_err());
    }

    #[test]
    fn traversal_is_rejected() {
        assert!(validate_component("..").is_err());
        assert!(validate_component("a..b").is_err());
        assert!(validate_component(".hidden").is_err());
    }

    #[test]
    fn empty_component_is_rejected() {
        assert!(validate_component("").is_err());
    }

    #[test]
    fn file_ids_carry_the_content_extension() {
        assert!(new_file_id("audio/wav").ends_with(".wav"));
        assert!(new_file_id("audio/mpeg").ends_with(".mp3"));
        assert!(new_file_id("application/octet-stream").ends_with(".bin"));
    }
}
