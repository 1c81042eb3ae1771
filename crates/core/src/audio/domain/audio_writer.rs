use std::path::Path;

use super::audio_normalizer::NormalizeError;
use super::audio_segment::AudioSegment;

/// Domain interface for encoding audio into the canonical WAV container.
pub trait AudioWriter: Send {
    /// Encode the segment to `path`. Must not leave a partial file on failure.
    fn write_wav(&self, path: &Path, audio: &AudioSegment) -> Result<(), NormalizeError>;
}
