use std::path::PathBuf;

use thiserror::Error;

use super::audio_segment::AudioSegment;
use super::transcript::TextualTranscript;

#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("speech model not found at {0}")]
    ModelNotFound(PathBuf),
    #[error("failed to load speech model: {0}")]
    ModelLoad(String),
    #[error("speech inference failed: {0}")]
    Inference(String),
}

/// Domain interface for speech-to-text transcription.
///
/// The whole clip is submitted as one unit; implementations perform
/// automatic language detection and return the concatenated text only.
/// Silent or empty audio is a legitimately empty transcript, not an error.
pub trait SpeechRecognizer: Send {
    fn transcribe(&self, audio: &AudioSegment) -> Result<TextualTranscript, TranscribeError>;
}
