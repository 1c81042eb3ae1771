use std::sync::Arc;

use super::completion_service::{AnalysisServiceError, CompletionService};
use crate::audio::domain::transcript::TextualTranscript;

const SYSTEM_PROMPT: &str =
    "You reformat call transcripts into clearly labeled per-speaker dialogue.";

/// Restructures a raw transcript into per-speaker dialogue via the LLM.
///
/// Speaker identity is inferred entirely by the model; the returned text is
/// not parsed or validated against the requested format.
pub struct ConversationStructurer {
    service: Arc<dyn CompletionService>,
}

impl ConversationStructurer {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    pub fn structure(
        &self,
        transcript: &TextualTranscript,
    ) -> Result<TextualTranscript, AnalysisServiceError> {
        let prompt = render_prompt(transcript.text());
        let output = self.service.complete(SYSTEM_PROMPT, &prompt)?;
        if output.trim().is_empty() {
            return Err(AnalysisServiceError::EmptyCompletion);
        }
        Ok(TextualTranscript::structured(output))
    }
}

fn render_prompt(transcript: &str) -> String {
    format!(
        "The following is a raw transcript of a sales call. Work out how many \
         distinct speakers there are and who says what, then rewrite the \
         conversation as labeled dialogue.\n\
         \n\
         Sales Call Transcript:\n\
         {transcript}\n\
         \n\
         Write each turn as a speaker label in capitals followed by a colon and \
         that speaker's words, for example:\n\
         \n\
         SALESPERSON: ...\n\
         \n\
         CUSTOMER: ...\n\
         \n\
         Separate turns with blank lines. Output only the dialogue."
    )
}
