mod config;
mod output;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;

use songcritic_core::{
    mime_for_path, CritiqueError, CritiquePipeline, CritiqueRequester, CritiqueSession,
    DisplayArea, FileRejected, InputMode, InputState, PromptBuilder,
};
use songcritic_critique::{ConsistencyPolicy, RenderedCritique};
use songcritic_logging::{init_tracing, LogFormat, Logger};
use songcritic_service::{CritiqueModel, GeminiService};

use crate::config::ProjectConfig;

#[derive(Parser, Debug)]
#[command(
    name = "songcritic",
    about = "Structured critiques of songs and lyrics",
    version,
    author
)]
struct Cli {
    /// Audio file to critique (max 10 MB)
    #[arg(short, long, conflicts_with_all = ["lyrics", "lyrics_file"])]
    audio: Option<PathBuf>,

    /// MIME type of the audio file (guessed from the extension if omitted)
    #[arg(long, requires = "audio")]
    mime: Option<String>,

    /// Lyrics to critique without audio
    #[arg(short, long, conflicts_with = "lyrics_file")]
    lyrics: Option<String>,

    /// File containing lyrics to critique without audio
    #[arg(long)]
    lyrics_file: Option<PathBuf>,

    /// Lyrics sent alongside the audio file
    #[arg(long, requires = "audio", conflicts_with = "aux_lyrics_file")]
    aux_lyrics: Option<String>,

    /// File with lyrics sent alongside the audio file
    #[arg(long, requires = "audio")]
    aux_lyrics_file: Option<PathBuf>,

    /// Model tier: flash or pro
    #[arg(short, long)]
    model: Option<String>,

    /// Directory for document.html and summary.html (default: print to stdout)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Print the decoded critique as JSON instead of rendering it
    #[arg(long)]
    json_output: bool,

    /// Reject responses that break the scoring rules
    #[arg(long)]
    strict: bool,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormatChoice>,

    /// Tracing filter used when RUST_LOG is unset
    #[arg(long, env = "SONGCRITIC_LOG", default_value = "warn")]
    log_level: String,

    /// Dry run: print the request without sending it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

/// Invalid input (nothing staged, or a file refused at staging) exits with 2,
/// every other failure with 1
fn exit_code(error: &anyhow::Error) -> i32 {
    let invalid_input = error.downcast_ref::<FileRejected>().is_some()
        || matches!(
            error.downcast_ref::<CritiqueError>(),
            Some(CritiqueError::InvalidInput(_))
        );
    if invalid_input {
        2
    } else {
        1
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!();
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let config = ProjectConfig::discover(&working_dir)?;

    let log_format = match (cli.log_format, config.log_format.as_deref()) {
        (Some(choice), _) => choice.into(),
        (None, Some(name)) => name.parse::<LogFormat>().map_err(anyhow::Error::msg)?,
        (None, None) => LogFormat::default(),
    };
    init_tracing(&cli.log_level, log_format).context("Failed to initialize tracing")?;

    let model = match cli.model.as_deref().or(config.model.as_deref()) {
        Some(name) => name.parse::<CritiqueModel>().map_err(anyhow::Error::msg)?,
        None => CritiqueModel::default(),
    };
    let policy = if cli.strict || config.strict() {
        ConsistencyPolicy::Strict
    } else {
        ConsistencyPolicy::Lenient
    };

    let session = CritiqueSession::new();
    let staged = stage_input(&cli)?;
    session.update_input(|input| *input = staged)?;

    if cli.dry_run {
        return print_dry_run(&session.input(), model, policy);
    }

    let service = GeminiService::from_env(config.api_key_env(), config.base_url.clone())
        .context("Gemini API key not configured")?;

    let logger = match &config.log_file {
        Some(path) => Logger::with_file(log_format, path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?,
        None => Logger::new(log_format),
    };
    let pipeline = CritiquePipeline::new(&service, Arc::new(logger))
        .with_model(model)
        .with_policy(policy);

    if cli.json_output {
        return match pipeline.fetch(&session.input()).await {
            Ok(result) => {
                println!("{}", serde_json::to_string_pretty(&result)?);
                Ok(())
            }
            Err(e) => fail(e),
        };
    }

    if let Err(e) = session.submit(&pipeline).await {
        return fail(e);
    }

    match session.display() {
        DisplayArea::Critique(rendered) => {
            let out_dir = cli.out_dir.or(config.output_dir);
            emit(&rendered, out_dir.as_deref())
        }
        other => anyhow::bail!("Submission finished without a critique: {:?}", other),
    }
}

/// Build the input state the flags describe
fn stage_input(cli: &Cli) -> Result<InputState> {
    let mut input = InputState::new();

    if let Some(path) = &cli.audio {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let mime_type = match &cli.mime {
            Some(mime) => mime.clone(),
            None => mime_for_path(path)
                .map(str::to_string)
                .with_context(|| {
                    format!("Cannot guess the audio type of {}; pass --mime", path.display())
                })?,
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        input.select_mode(InputMode::Upload);
        input
            .stage_file(bytes, &mime_type, &name)
            .with_context(|| format!("Rejected {}", path.display()))?;

        if let Some(aux) = read_text(cli.aux_lyrics.as_deref(), cli.aux_lyrics_file.as_deref())? {
            input.set_auxiliary_lyrics(&aux);
        }
    } else if let Some(lyrics) = read_text(cli.lyrics.as_deref(), cli.lyrics_file.as_deref())? {
        input.select_mode(InputMode::Lyrics);
        input.set_lyrics(&lyrics);
    }

    Ok(input)
}

fn read_text(inline: Option<&str>, file: Option<&Path>) -> Result<Option<String>> {
    match (inline, file) {
        (Some(text), _) => Ok(Some(text.to_string())),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map(Some)
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => Ok(None),
    }
}

fn print_dry_run(
    input: &InputState,
    model: CritiqueModel,
    policy: ConsistencyPolicy,
) -> Result<()> {
    let payload = PromptBuilder::build(input).map_err(CritiqueError::from)?;
    let request = CritiqueRequester::build_request(&payload, model);

    eprintln!("=== Dry Run ===");
    eprintln!("Mode: {}", payload.mode.as_str());
    eprintln!("Model: {} (temperature {})", model, model.temperature());
    eprintln!("Consistency: {:?}", policy);
    if let Some(file) = input.staged_file() {
        eprintln!("Audio: {} ({}, {} bytes)", file.name(), file.mime_type(), file.len());
    }

    let preview = output::redact_media(&request);
    println!("{}", serde_json::to_string_pretty(&preview)?);
    Ok(())
}

fn emit(rendered: &RenderedCritique, out_dir: Option<&Path>) -> Result<()> {
    match out_dir {
        Some(dir) => {
            for path in output::write_views(rendered, dir)? {
                eprintln!("  {} {}", "->".bright_green(), path.display());
            }
        }
        None => {
            println!("{}", rendered.document);
            if rendered.summary.is_some() {
                println!("{}", rendered.summary_html());
            }
        }
    }
    Ok(())
}

/// Report a failed submission with its fixed user-facing message
fn fail(error: CritiqueError) -> Result<()> {
    eprintln!();
    eprintln!("{} {}", "error:".red().bold(), error.user_message());
    std::process::exit(exit_code(&error.into()));
}
