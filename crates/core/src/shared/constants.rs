pub const WHISPER_MODEL_NAME: &str = "ggml-base.bin";
pub const WHISPER_MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.bin";

/// Sample rate the canonical WAV is resampled to; Whisper's input rate.
pub const CANONICAL_SAMPLE_RATE: u32 = 16000;

/// Default OpenAI-compatible endpoint and chat model for the two LLM stages.
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";

/// Default per-request timeout for completion calls, in seconds.
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 120;
