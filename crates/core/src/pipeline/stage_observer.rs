use std::fmt;
use std::time::Duration;

/// The pipeline's sequential stages, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Upload,
    Normalize,
    Transcribe,
    Structure,
    Analyze,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Upload => "upload",
            Stage::Normalize => "normalize",
            Stage::Transcribe => "transcribe",
            Stage::Structure => "structure",
            Stage::Analyze => "analyze",
        };
        f.write_str(name)
    }
}

/// Cross-cutting observer for pipeline stage events.
///
/// Decouples the use case from any specific output mechanism so embedders
/// can surface progress however they like and tests can stay silent.
pub trait StageObserver: Send {
    fn stage_started(&self, stage: Stage);
    fn stage_finished(&self, stage: Stage, elapsed: Duration);
    fn info(&self, message: &str);
}

/// Silent observer for tests and embedders with their own progress UI.
pub struct NullStageObserver;

impl StageObserver for NullStageObserver {
    fn stage_started(&self, _stage: Stage) {}
    fn stage_finished(&self, _stage: Stage, _elapsed: Duration) {}
    fn info(&self, _message: &str) {}
}

/// Observer that reports through the `log` crate; what the CLI wires in.
pub struct LogStageObserver;

impl StageObserver for LogStageObserver {
    fn stage_started(&self, stage: Stage) {
        log::info!("{stage}...");
    }

    fn stage_finished(&self, stage: Stage, elapsed: Duration) {
        log::info!("{stage} done in {:.1}s", elapsed.as_secs_f64());
    }

    fn info(&self, message: &str) {
        log::info!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display_names() {
        let names: Vec<String> = [
            Stage::Upload,
            Stage::Normalize,
            Stage::Transcribe,
            Stage::Structure,
            Stage::Analyze,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(
            names,
            ["upload", "normalize", "transcribe", "structure", "analyze"]
        );
    }
}
