use std::path::{Path, PathBuf};

use super::audio_normalizer::NormalizeError;

/// Container formats accepted at upload. WAV is the canonical format the
/// transcription stage consumes; everything else gets converted first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    M4a,
}

pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a"];

impl AudioFormat {
    pub fn from_path(path: &Path) -> Result<Self, NormalizeError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "wav" => Ok(AudioFormat::Wav),
            "mp3" => Ok(AudioFormat::Mp3),
            "m4a" => Ok(AudioFormat::M4a),
            _ => Err(NormalizeError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: format!(
                    "unrecognized extension, expected one of: {}",
                    SUPPORTED_EXTENSIONS.join(", ")
                ),
            }),
        }
    }

    pub fn is_canonical(&self) -> bool {
        matches!(self, AudioFormat::Wav)
    }
}

/// A single uploaded recording: the file on disk plus its declared format.
///
/// Exactly one artifact exists per request; the upload store owns the
/// backing file and releases it when the request finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioArtifact {
    path: PathBuf,
    format: AudioFormat,
}

impl AudioArtifact {
    pub fn new(path: PathBuf, format: AudioFormat) -> Self {
        Self { path, format }
    }

    pub fn from_path(path: &Path) -> Result<Self, NormalizeError> {
        let format = AudioFormat::from_path(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            format,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }
}
