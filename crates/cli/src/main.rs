use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use callcoach_core::analysis::domain::completion_service::CompletionService;
use callcoach_core::analysis::domain::conversation_structurer::ConversationStructurer;
use callcoach_core::analysis::domain::sales_analyzer::SalesAnalyzer;
use callcoach_core::analysis::infrastructure::openai_completion::{
    OpenAiCompletionService, OpenAiConfig,
};
use callcoach_core::audio::domain::audio_artifact::AudioFormat;
use callcoach_core::audio::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use callcoach_core::audio::infrastructure::ffmpeg_normalizer::FfmpegNormalizer;
use callcoach_core::audio::infrastructure::ffmpeg_wav_writer::FfmpegWavWriter;
use callcoach_core::audio::infrastructure::whisper_recognizer::WhisperRecognizer;
use callcoach_core::pipeline::analyze_call_use_case::{AnalyzeCallUseCase, CallAnalysis};
use callcoach_core::pipeline::stage_observer::LogStageObserver;
use callcoach_core::shared::constants::{WHISPER_MODEL_NAME, WHISPER_MODEL_URL};
use callcoach_core::shared::model_resolver;

/// Transcribe a sales call recording and get a coach's risk/recommendation report.
#[derive(Parser)]
#[command(name = "callcoach")]
struct Cli {
    /// Input recording (wav, mp3 or m4a).
    input: PathBuf,

    /// Skip the per-speaker dialogue structuring stage.
    #[arg(long)]
    no_structure: bool,

    /// Chat model for the structuring and analysis stages.
    #[arg(long)]
    model: Option<String>,

    /// OpenAI-compatible API base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout for completion calls, in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Local Whisper GGML model file (downloaded to the cache otherwise).
    #[arg(long)]
    whisper_model: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    // Resolve the credential and both models up front; a missing API key
    // must fail before any audio work happens
    let mut config = OpenAiConfig::from_env()?;
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let service: Arc<dyn CompletionService> = Arc::new(OpenAiCompletionService::new(config)?);

    let model_path = match cli.whisper_model {
        Some(path) => path,
        None => {
            log::info!("Resolving speech model: {WHISPER_MODEL_NAME}");
            let path = model_resolver::resolve(
                WHISPER_MODEL_NAME,
                WHISPER_MODEL_URL,
                Some(Box::new(download_progress)),
            )?;
            eprintln!();
            path
        }
    };
    let recognizer = WhisperRecognizer::new(&model_path)?;

    let structurer = if cli.no_structure {
        None
    } else {
        Some(ConversationStructurer::new(service.clone()))
    };

    let use_case = AnalyzeCallUseCase::new(
        Box::new(FfmpegNormalizer::new(
            Box::new(FfmpegAudioReader),
            Box::new(FfmpegWavWriter),
        )),
        Box::new(FfmpegAudioReader),
        Box::new(recognizer),
        structurer,
        SalesAnalyzer::new(service),
        Box::new(LogStageObserver),
    );

    let bytes = std::fs::read(&cli.input)?;
    let upload_name = cli
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or("Input path has no file name")?;

    let analysis = use_case.run(upload_name, &bytes)?;
    print_panels(&analysis);
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    AudioFormat::from_path(&cli.input)?;
    if cli.timeout_secs == Some(0) {
        return Err("Timeout must be greater than 0".into());
    }
    if let Some(path) = &cli.whisper_model {
        if !path.exists() {
            return Err(format!("Whisper model not found: {}", path.display()).into());
        }
    }
    Ok(())
}

fn print_panels(analysis: &CallAnalysis) {
    print_panel("Transcript", analysis.transcript.text());
    if let Some(structured) = &analysis.structured {
        print_panel("Structured dialogue", structured.text());
    }
    print_panel("Sales analysis", analysis.report.text());
}

fn print_panel(title: &str, body: &str) {
    println!("─── {title} ───");
    println!("{body}");
    println!();
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading speech model... {pct}%");
    } else {
        eprint!("\rDownloading speech model... {downloaded} bytes");
    }
}
