use std::path::{Path, PathBuf};

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::domain::audio_segment::AudioSegment;
use crate::audio::domain::speech_recognizer::{SpeechRecognizer, TranscribeError};
use crate::audio::domain::transcript::TextualTranscript;

/// Speech recognizer using whisper.cpp via whisper-rs.
///
/// Runs the whole clip through the model in one pass with automatic
/// language detection and returns only the concatenated text; token
/// timing and confidence are discarded.
#[derive(Debug)]
pub struct WhisperRecognizer {
    model_path: PathBuf,
}

impl WhisperRecognizer {
    pub fn new(model_path: &Path) -> Result<Self, TranscribeError> {
        if !model_path.exists() {
            return Err(TranscribeError::ModelNotFound(model_path.to_path_buf()));
        }
        Ok(Self {
            model_path: model_path.to_path_buf(),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(&self, audio: &AudioSegment) -> Result<TextualTranscript, TranscribeError> {
        // A silent upload is a legitimately empty transcript
        if audio.is_empty() {
            return Ok(TextualTranscript::raw(String::new()));
        }

        let ctx = WhisperContext::new_with_params(
            self.model_path
                .to_str()
                .ok_or_else(|| TranscribeError::ModelLoad("invalid model path".to_string()))?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| TranscribeError::ModelLoad(e.to_string()))?;

        let mut state = ctx
            .create_state()
            .map_err(|e| TranscribeError::ModelLoad(e.to_string()))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 0 });
        params.set_language(Some("auto"));
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(num_cpus().min(4) as i32);

        state
            .full(params, audio.samples())
            .map_err(|e| TranscribeError::Inference(e.to_string()))?;

        let mut text = String::new();
        let num_segments = state.full_n_segments();

        for seg_idx in 0..num_segments {
            let segment = match state.get_segment(seg_idx) {
                Some(s) => s,
                None => continue,
            };

            let n_tokens = segment.n_tokens();
            for tok_idx in 0..n_tokens {
                let token = match segment.get_token(tok_idx) {
                    Some(t) => t,
                    None => continue,
                };

                let token_text = match token.to_str() {
                    Ok(t) => t,
                    Err(_) => continue,
                };

                // Skip special tokens (start with [, like [_BEG_], [_SOT_], etc.)
                let trimmed = token_text.trim();
                if trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with('<') {
                    continue;
                }

                text.push_str(token_text);
            }
        }

        Ok(TextualTranscript::raw(text.trim().to_string()))
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
