use std::path::Path;

use super::audio_normalizer::NormalizeError;
use super::audio_segment::AudioSegment;

/// Domain interface for decoding an audio file.
pub trait AudioReader: Send {
    /// Decode the file to a mono PCM AudioSegment at the given sample rate.
    ///
    /// An undecodable container is an `UnsupportedFormat` error, never a
    /// partial result.
    fn read_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<AudioSegment, NormalizeError>;
}
