pub mod ffmpeg_audio_reader;
pub mod ffmpeg_normalizer;
pub mod ffmpeg_wav_writer;
pub mod whisper_recognizer;
