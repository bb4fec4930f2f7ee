use async_trait::async_trait;
use indicatif::ProgressBar;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_MODEL: &str = "sshleifer/distilbart-cnn-12-6";
pub const DEFAULT_API_BASE: &str = "https://router.huggingface.co/hf-inference/models";
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Environment variable holding the inference API token
pub const HF_TOKEN_ENV: &str = "HF_TOKEN";

/// Decoding parameters sent with every chunk. Sampling stays off so identical
/// input always yields identical output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 200,
            min_length: 30,
            do_sample: false,
        }
    }
}

/// A pretrained summarization model.
#[async_trait]
pub trait SummaryModel: Send + Sync {
    async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String>;
}

/// Split `text` into chunks of `chunk_size` characters, in order.
///
/// The last chunk may be shorter. A `chunk_size` of zero disables splitting.
/// Chunk boundaries always fall on character boundaries.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    if chunk_size == 0 {
        return vec![text];
    }

    let mut chunks = Vec::with_capacity(text.len() / chunk_size + 1);
    let mut start = 0;
    for (count, (idx, _)) in text.char_indices().enumerate() {
        if count > 0 && count % chunk_size == 0 {
            chunks.push(&text[start..idx]);
            start = idx;
        }
    }
    chunks.push(&text[start..]);
    chunks
}

/// Summarizes long text chunk by chunk and joins the partial summaries.
///
/// Chunks are summarized independently; the result is not re-summarized.
pub struct Summarizer<M> {
    model: M,
    chunk_size: usize,
    params: GenerationParams,
}

impl<M: SummaryModel> Summarizer<M> {
    pub fn new(model: M, chunk_size: usize, params: GenerationParams) -> Self {
        Self {
            model,
            chunk_size,
            params,
        }
    }

    pub async fn summarize(&self, text: &str, progress: &ProgressBar) -> Result<String> {
        let chunks = chunk_text(text, self.chunk_size);
        let total = chunks.len();
        debug!("Summarizing {} chars in {total} chunk(s)", text.chars().count());
        progress.set_length(total as u64);

        let mut summaries = Vec::with_capacity(total);
        for (i, chunk) in chunks.into_iter().enumerate() {
            progress.set_message(format!("chunk {}/{total}", i + 1));
            let summary = self.model.summarize(chunk, &self.params).await?;
            debug!(
                "Chunk {}/{total}: {} chars -> {} chars",
                i + 1,
                chunk.chars().count(),
                summary.chars().count()
            );
            summaries.push(summary);
            progress.inc(1);
        }
        progress.finish_and_clear();

        Ok(summaries.join(" "))
    }
}

#[derive(Debug, Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

/// Summarization model behind a Hugging Face style inference endpoint
pub struct HuggingFaceModel {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HuggingFaceModel {
    pub fn new(client: reqwest::Client, api_base: &str, model: &str) -> Self {
        let token = std::env::var(HF_TOKEN_ENV).ok().filter(|t| !t.is_empty());
        if token.is_none() {
            debug!("{HF_TOKEN_ENV} not set, calling the inference endpoint anonymously");
        }
        Self {
            client,
            endpoint: format!("{}/{model}", api_base.trim_end_matches('/')),
            token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SummaryModel for HuggingFaceModel {
    async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String> {
        debug!("Summarizing via {}", self.endpoint);

        let body = serde_json::json!({
            "inputs": text,
            "parameters": params,
        });

        let mut req = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Summarization(format!("inference API returned {status}: {body}")));
        }

        let json: serde_json::Value = resp.json().await?;
        extract_summary_text(json)
    }
}

fn extract_summary_text(json: serde_json::Value) -> Result<String> {
    if let Some(message) = json.get("error").and_then(|e| e.as_str()) {
        return Err(Error::Summarization(message.to_string()));
    }

    let outputs: Vec<SummaryOutput> = serde_json::from_value(json)
        .map_err(|e| Error::Summarization(format!("unexpected inference API response: {e}")))?;
    outputs
        .into_iter()
        .next()
        .map(|o| o.summary_text)
        .ok_or_else(|| Error::Summarization("inference API returned no summaries".to_string()))
}
