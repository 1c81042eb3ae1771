use std::sync::Arc;

use super::completion_service::{AnalysisServiceError, CompletionService};
use crate::audio::domain::transcript::{AnalysisReport, TextualTranscript};

const SYSTEM_PROMPT: &str = "You are an expert sales coach analyzing sales calls and \
     providing accurate, straight to the point advice.";

/// Produces the risk/recommendation report from any text rendering of the
/// call, raw or structured.
///
/// The three-section layout is requested by the prompt only; the model's
/// output is returned as-is.
pub struct SalesAnalyzer {
    service: Arc<dyn CompletionService>,
}

impl SalesAnalyzer {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    pub fn analyze(
        &self,
        transcript: &TextualTranscript,
    ) -> Result<AnalysisReport, AnalysisServiceError> {
        let prompt = render_prompt(transcript.text());
        let output = self.service.complete(SYSTEM_PROMPT, &prompt)?;
        if output.trim().is_empty() {
            return Err(AnalysisServiceError::EmptyCompletion);
        }
        Ok(AnalysisReport(output))
    }
}

fn render_prompt(transcript: &str) -> String {
    format!(
        "Analyze the following sales conversation across six dimensions: \
         Solution, Price, Decision makers, Competition, Planning, Legal. \
         Identify the key risks and provide recommended actions, stating the \
         outcome you expect from each action.\n\
         \n\
         Sales Call Transcript:\n\
         {transcript}\n\
         \n\
         Structure the output as:\n\
         - Sales Analysis\n\
         - Identified Risks\n\
         - Recommended Actions"
    )
}
