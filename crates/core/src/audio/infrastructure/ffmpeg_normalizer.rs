use crate::audio::domain::audio_artifact::{AudioArtifact, AudioFormat};
use crate::audio::domain::audio_normalizer::{AudioNormalizer, NormalizeError};
use crate::audio::domain::audio_reader::AudioReader;
use crate::audio::domain::audio_writer::AudioWriter;
use crate::shared::constants::CANONICAL_SAMPLE_RATE;

/// Converts uploaded recordings to the canonical 16 kHz mono WAV by
/// decoding with one seam and re-encoding with the other.
///
/// A canonical artifact passes through untouched; nothing is decoded or
/// rewritten for a `.wav` upload.
pub struct FfmpegNormalizer {
    reader: Box<dyn AudioReader>,
    writer: Box<dyn AudioWriter>,
}

impl FfmpegNormalizer {
    pub fn new(reader: Box<dyn AudioReader>, writer: Box<dyn AudioWriter>) -> Self {
        Self { reader, writer }
    }
}

impl AudioNormalizer for FfmpegNormalizer {
    fn normalize(&self, artifact: &AudioArtifact) -> Result<AudioArtifact, NormalizeError> {
        if artifact.format().is_canonical() {
            return Ok(artifact.clone());
        }

        log::debug!(
            "converting {} to canonical wav",
            artifact.path().display()
        );
        let audio = self.reader.read_audio(artifact.path(), CANONICAL_SAMPLE_RATE)?;
        let wav_path = artifact.path().with_extension("wav");
        self.writer.write_wav(&wav_path, &audio)?;

        Ok(AudioArtifact::new(wav_path, AudioFormat::Wav))
    }
}
