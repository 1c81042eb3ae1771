use std::time::Instant;

use thiserror::Error;

use crate::analysis::domain::completion_service::AnalysisServiceError;
use crate::analysis::domain::conversation_structurer::ConversationStructurer;
use crate::analysis::domain::sales_analyzer::SalesAnalyzer;
use crate::audio::domain::audio_artifact::AudioArtifact;
use crate::audio::domain::audio_normalizer::{AudioNormalizer, NormalizeError};
use crate::audio::domain::audio_reader::AudioReader;
use crate::audio::domain::speech_recognizer::{SpeechRecognizer, TranscribeError};
use crate::audio::domain::transcript::{AnalysisReport, TextualTranscript};
use crate::pipeline::stage_observer::{Stage, StageObserver};
use crate::pipeline::upload_store::ScopedUpload;
use crate::shared::constants::CANONICAL_SAMPLE_RATE;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to store upload: {0}")]
    Upload(#[from] std::io::Error),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Transcribe(#[from] TranscribeError),
    #[error(transparent)]
    Analysis(#[from] AnalysisServiceError),
}

/// Everything a successful request delivers: the raw transcript, the
/// structured dialogue when that stage ran, and the coach's report.
#[derive(Clone, Debug)]
pub struct CallAnalysis {
    pub transcript: TextualTranscript,
    pub structured: Option<TextualTranscript>,
    pub report: AnalysisReport,
}

/// Orchestrates one request end to end:
/// upload → normalize → transcribe → [structure] → analyze → cleanup.
///
/// Stages run strictly in sequence and any failure aborts the rest,
/// surfacing that stage's error untouched. The scoped upload is released
/// on every exit path; no retry, no partial results.
pub struct AnalyzeCallUseCase {
    normalizer: Box<dyn AudioNormalizer>,
    reader: Box<dyn AudioReader>,
    recognizer: Box<dyn SpeechRecognizer>,
    structurer: Option<ConversationStructurer>,
    analyzer: SalesAnalyzer,
    observer: Box<dyn StageObserver>,
}

impl AnalyzeCallUseCase {
    pub fn new(
        normalizer: Box<dyn AudioNormalizer>,
        reader: Box<dyn AudioReader>,
        recognizer: Box<dyn SpeechRecognizer>,
        structurer: Option<ConversationStructurer>,
        analyzer: SalesAnalyzer,
        observer: Box<dyn StageObserver>,
    ) -> Self {
        Self {
            normalizer,
            reader,
            recognizer,
            structurer,
            analyzer,
            observer,
        }
    }

    pub fn run(&self, upload_name: &str, bytes: &[u8]) -> Result<CallAnalysis, PipelineError> {
        // Dropping the upload on any exit path below removes the temp
        // directory, including the normalizer's derived wav
        let upload = self.stage(Stage::Upload, || {
            Ok(ScopedUpload::persist(upload_name, bytes)?)
        })?;

        let canonical = self.stage(Stage::Normalize, || {
            let artifact = AudioArtifact::from_path(upload.path())?;
            Ok(self.normalizer.normalize(&artifact)?)
        })?;

        let transcript = self.stage(Stage::Transcribe, || {
            let audio = self
                .reader
                .read_audio(canonical.path(), CANONICAL_SAMPLE_RATE)?;
            Ok(self.recognizer.transcribe(&audio)?)
        })?;

        let structured = match &self.structurer {
            Some(structurer) => Some(self.stage(Stage::Structure, || {
                Ok(structurer.structure(&transcript)?)
            })?),
            None => None,
        };

        let analysis_input = structured.as_ref().unwrap_or(&transcript);
        let report = self.stage(Stage::Analyze, || {
            Ok(self.analyzer.analyze(analysis_input)?)
        })?;

        Ok(CallAnalysis {
            transcript,
            structured,
            report,
        })
    }

    fn stage<T>(
        &self,
        stage: Stage,
        f: impl FnOnce() -> Result<T, PipelineError>,
    ) -> Result<T, PipelineError> {
        self.observer.stage_started(stage);
        let start = Instant::now();
        let result = f()?;
        self.observer.stage_finished(stage, start.elapsed());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::completion_service::CompletionService;
    use crate::audio::domain::audio_artifact::AudioFormat;
    use crate::audio::domain::audio_segment::AudioSegment;
    use crate::audio::domain::transcript::TranscriptKind;
    use crate::pipeline::stage_observer::NullStageObserver;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    // ─── Stubs ───

    struct PassthroughNormalizer {
        normalized: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl AudioNormalizer for PassthroughNormalizer {
        fn normalize(&self, artifact: &AudioArtifact) -> Result<AudioArtifact, NormalizeError> {
            self.normalized
                .lock()
                .unwrap()
                .push(artifact.path().to_path_buf());
            if artifact.format().is_canonical() {
                Ok(artifact.clone())
            } else {
                Ok(AudioArtifact::new(
                    artifact.path().with_extension("wav"),
                    AudioFormat::Wav,
                ))
            }
        }
    }

    struct StubReader {
        read_paths: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl AudioReader for StubReader {
        fn read_audio(&self, path: &Path, rate: u32) -> Result<AudioSegment, NormalizeError> {
            self.read_paths.lock().unwrap().push(path.to_path_buf());
            Ok(AudioSegment::new(vec![0.0; 1600], rate))
        }
    }

    struct StubRecognizer;

    impl SpeechRecognizer for StubRecognizer {
        fn transcribe(&self, _: &AudioSegment) -> Result<TextualTranscript, TranscribeError> {
            Ok(TextualTranscript::raw(
                "hello thanks for taking the call".to_string(),
            ))
        }
    }

    struct StubCompletion {
        fail_on_analysis: bool,
    }

    impl CompletionService for StubCompletion {
        fn complete(
            &self,
            system_prompt: &str,
            user_prompt: &str,
        ) -> Result<String, AnalysisServiceError> {
            if system_prompt.contains("sales coach") {
                if self.fail_on_analysis {
                    return Err(AnalysisServiceError::Api {
                        status: 500,
                        body: "backend down".to_string(),
                    });
                }
                return Ok("Sales Analysis\nIdentified Risks\nRecommended Actions".to_string());
            }
            // Structuring call: echo the transcript back as labeled dialogue
            assert!(user_prompt.contains("hello thanks for taking the call"));
            Ok("SALESPERSON: hello\n\nCUSTOMER: thanks for taking the call".to_string())
        }
    }

    struct UseCaseParts {
        use_case: AnalyzeCallUseCase,
        normalized: Arc<Mutex<Vec<PathBuf>>>,
        read_paths: Arc<Mutex<Vec<PathBuf>>>,
    }

    fn build(structuring: bool, fail_on_analysis: bool) -> UseCaseParts {
        let normalized = Arc::new(Mutex::new(Vec::new()));
        let read_paths = Arc::new(Mutex::new(Vec::new()));
        let service: Arc<dyn CompletionService> = Arc::new(StubCompletion { fail_on_analysis });

        let use_case = AnalyzeCallUseCase::new(
            Box::new(PassthroughNormalizer {
                normalized: normalized.clone(),
            }),
            Box::new(StubReader {
                read_paths: read_paths.clone(),
            }),
            Box::new(StubRecognizer),
            structuring.then(|| ConversationStructurer::new(service.clone())),
            SalesAnalyzer::new(service),
            Box::new(NullStageObserver),
        );

        UseCaseParts {
            use_case,
            normalized,
            read_paths,
        }
    }

    #[test]
    fn test_canonical_upload_with_structuring_delivers_all_three_outputs() {
        let parts = build(true, false);
        let analysis = parts.use_case.run("call.wav", b"fake wav").unwrap();

        assert!(!analysis.transcript.is_empty());
        assert_eq!(analysis.transcript.kind(), TranscriptKind::Raw);

        let structured = analysis.structured.expect("structuring was enabled");
        assert_eq!(structured.kind(), TranscriptKind::Structured);
        assert!(structured.text().contains("SALESPERSON:"));
        assert!(structured.text().contains("CUSTOMER:"));

        assert!(!analysis.report.text().is_empty());
    }

    #[test]
    fn test_non_canonical_upload_is_normalized_before_decoding() {
        let parts = build(true, false);
        parts.use_case.run("call.mp3", b"fake mp3").unwrap();

        let normalized = parts.normalized.lock().unwrap();
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].file_name().unwrap(), "upload.mp3");

        // The transcribe stage decoded the converted wav, not the original
        let read_paths = parts.read_paths.lock().unwrap();
        assert_eq!(read_paths.len(), 1);
        assert_eq!(read_paths[0].file_name().unwrap(), "upload.wav");
    }

    #[test]
    fn test_analysis_failure_surfaces_error_and_cleans_up() {
        let parts = build(true, true);
        let err = parts.use_case.run("call.wav", b"fake wav").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Analysis(AnalysisServiceError::Api { status: 500, .. })
        ));

        // Earlier stages ran, but their temp artifact is gone
        let normalized = parts.normalized.lock().unwrap();
        assert_eq!(normalized.len(), 1);
        assert!(!normalized[0].exists());
    }

    #[test]
    fn test_structuring_disabled_feeds_raw_transcript_to_analyzer() {
        let parts = build(false, false);
        let analysis = parts.use_case.run("call.wav", b"fake wav").unwrap();
        assert!(analysis.structured.is_none());
        assert!(!analysis.report.text().is_empty());
    }

    #[test]
    fn test_unknown_extension_fails_before_normalization() {
        let parts = build(true, false);
        let err = parts.use_case.run("call.ogg", b"whatever").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Normalize(NormalizeError::UnsupportedFormat { .. })
        ));
        assert!(parts.normalized.lock().unwrap().is_empty());
    }

    #[test]
    fn test_successful_run_removes_temp_artifact() {
        let parts = build(true, false);
        parts.use_case.run("call.wav", b"fake wav").unwrap();
        let normalized = parts.normalized.lock().unwrap();
        assert!(!normalized[0].exists());
    }
}
