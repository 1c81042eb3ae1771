/// Whether a transcript is the recognizer's raw text or the
/// LLM-restructured per-speaker dialogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TranscriptKind {
    Raw,
    Structured,
}

/// A text rendering of the call. Immutable once produced.
///
/// The analysis stage accepts either kind; the tag exists so callers can
/// tell which stage produced the text instead of juggling bare strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextualTranscript {
    text: String,
    kind: TranscriptKind,
}

impl TextualTranscript {
    pub fn raw(text: String) -> Self {
        Self {
            text,
            kind: TranscriptKind::Raw,
        }
    }

    pub fn structured(text: String) -> Self {
        Self {
            text,
            kind: TranscriptKind::Structured,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> TranscriptKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The sales coach's report: analysis, risks, and recommended actions.
/// Sectioning is promised by the prompt, not enforced structurally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisReport(pub String);

impl AnalysisReport {
    pub fn text(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_transcript_is_tagged_raw() {
        let t = TextualTranscript::raw("hello there".to_string());
        assert_eq!(t.kind(), TranscriptKind::Raw);
        assert_eq!(t.text(), "hello there");
    }

    #[test]
    fn test_structured_transcript_is_tagged_structured() {
        let t = TextualTranscript::structured("SPEAKER 1: hi".to_string());
        assert_eq!(t.kind(), TranscriptKind::Structured);
    }

    #[test]
    fn test_whitespace_only_transcript_is_empty() {
        let t = TextualTranscript::raw("  \n\t ".to_string());
        assert!(t.is_empty());
    }
}
