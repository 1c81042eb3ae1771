use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisServiceError {
    #[error("missing credential: set the {0} environment variable")]
    MissingCredential(&'static str),
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("completion response contained no content")]
    EmptyCompletion,
}

/// Domain interface for chat-style text completion.
///
/// One system-persona message plus one user message in, the first choice's
/// text out. Both LLM stages (dialogue structuring and sales analysis) run
/// through this seam, which is what lets tests substitute a fake backend.
pub trait CompletionService: Send + Sync {
    fn complete(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, AnalysisServiceError>;
}
