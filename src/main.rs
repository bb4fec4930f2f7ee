use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use eyre::{Result, WrapErr};
use log::{debug, info};

mod cli;

use cli::Cli;
use ytsum::config::{Config, Overrides, Settings};
use ytsum::summarize::{HF_TOKEN_ENV, HuggingFaceModel, Summarizer};
use ytsum::youtube::InnerTubeClient;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

fn build_after_help() -> String {
    let token_line = if std::env::var_os(HF_TOKEN_ENV).is_some() {
        format!("  \x1b[32m✅\x1b[0m {HF_TOKEN_ENV}   set")
    } else {
        format!("  \x1b[31m❌\x1b[0m {HF_TOKEN_ENV}   (not set, the inference API may reject anonymous calls)")
    };

    format!(
        "\nENVIRONMENT:\n{token_line}\n\nConfig is read from: {}\nLogs are written to: {}",
        ytsum::config::config_path().display(),
        log_dir().join("ytsum.log").display()
    )
}

fn prompt_url() -> Result<String> {
    print!("Enter YouTube URL: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn overrides(cli: &Cli) -> Overrides {
    Overrides {
        primary_lang: cli.lang.clone(),
        fallback_lang: cli.fallback_lang.clone(),
        fallback_mode: cli.fallback_mode,
        model: cli.model.clone(),
        chunk_size: cli.chunk_size,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Config file is optional; a broken one is logged and ignored
    let config = Config::load().unwrap_or_else(|e| {
        debug!("Ignoring config: {e}");
        Config::default()
    });
    let settings = Settings::resolve(config, overrides(&cli))?;
    debug!("Effective settings: {settings:?}");

    if cli.verbose {
        let config_path = ytsum::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
    }

    let url = match cli.url {
        Some(ref url) => url.clone(),
        None => prompt_url()?,
    };
    let video_id = ytsum::extract_video_id(&url)?;
    info!("Video ID: {video_id}");

    let client = reqwest::Client::new();
    let service = InnerTubeClient::new(client.clone());
    let transcript = ytsum::youtube::fetch_transcript(&service, &video_id, &settings.languages).await?;

    if cli.verbose {
        eprintln!(
            "Video: {} ({})\nLanguage: {}\nSegments: {}",
            transcript.title,
            transcript.video_id,
            transcript.language,
            transcript.segments.len(),
        );
    }

    println!("{}", ytsum::output::render_transcript(&transcript));

    let text = transcript.text();
    let model = HuggingFaceModel::new(client, &settings.api_base, &settings.model);
    if cli.verbose {
        let chunks = ytsum::summarize::chunk_text(&text, settings.chunk_size).len();
        eprintln!("Model: {} ({})\nChunks: {chunks}", settings.model, model.endpoint());
    }

    println!("{}", ytsum::output::SUMMARY_HEADER);
    let summarizer = Summarizer::new(model, settings.chunk_size, settings.generation.clone());
    let progress = ytsum::output::summary_progress();
    let summary = summarizer
        .summarize(&text, &progress)
        .await
        .wrap_err_with(|| format!("summarizing transcript of {video_id}"))?;

    println!("{summary}");

    Ok(())
}
