pub mod audio_artifact;
pub mod audio_normalizer;
pub mod audio_reader;
pub mod audio_segment;
pub mod audio_writer;
pub mod speech_recognizer;
pub mod transcript;
