use clap::Parser;
use ytsum::youtube::FallbackMode;

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "Fetch a YouTube transcript and summarize it",
    version
)]
pub struct Cli {
    /// YouTube video URL (prompted for if omitted)
    pub url: Option<String>,

    /// Preferred caption language [default: pt]
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Caption language tried when the preferred one fails [default: en]
    #[arg(long)]
    pub fallback_lang: Option<String>,

    /// Which failures of the preferred language trigger the fallback
    #[arg(long, value_enum)]
    pub fallback_mode: Option<FallbackMode>,

    /// Summarization model id
    #[arg(short, long)]
    pub model: Option<String>,

    /// Maximum characters per summarized chunk, 0 for no chunking [default: 1024]
    #[arg(short, long)]
    pub chunk_size: Option<usize>,

    /// Show config, video metadata and chunk counts
    #[arg(short, long)]
    pub verbose: bool,
}
