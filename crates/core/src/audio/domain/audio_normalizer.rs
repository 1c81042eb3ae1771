use std::path::PathBuf;

use thiserror::Error;

use super::audio_artifact::AudioArtifact;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("unsupported audio format for {path}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },
    #[error("failed to write canonical wav {path}: {reason}")]
    Encode { path: PathBuf, reason: String },
}

/// Domain interface for converting an uploaded recording into the
/// canonical container the rest of the pipeline can decode.
///
/// Implementations must be a no-op for artifacts already in the canonical
/// format and must leave no partial output file behind on failure.
pub trait AudioNormalizer: Send {
    fn normalize(&self, artifact: &AudioArtifact) -> Result<AudioArtifact, NormalizeError>;
}
