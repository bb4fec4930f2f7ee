//! Error types for ytsum.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("no captions in '{lang}' for video {video_id}")]
    NoCaptions { video_id: String, lang: String },

    #[error("transcript service error: {0}")]
    Service(String),

    #[error("transcript unavailable for video {video_id} (tried '{primary}', then '{fallback}')")]
    TranscriptUnavailable {
        video_id: String,
        primary: String,
        fallback: String,
        source: Box<Error>,
    },

    #[error("summarization failed: {0}")]
    Summarization(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// True when the service answered but had no track in the requested language.
    pub fn is_no_captions(&self) -> bool {
        matches!(self, Error::NoCaptions { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_transcript_unavailable_reports_cause_once() {
        let err = Error::TranscriptUnavailable {
            video_id: "abc123".to_string(),
            primary: "pt".to_string(),
            fallback: "en".to_string(),
            source: Box::new(Error::NoCaptions {
                video_id: "abc123".to_string(),
                lang: "en".to_string(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "transcript unavailable for video abc123 (tried 'pt', then 'en')"
        );
        let cause = err.source().unwrap().to_string();
        assert_eq!(cause, "no captions in 'en' for video abc123");
    }
}
