pub mod config;
pub mod error;
pub mod output;
pub mod summarize;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;

pub use error::{Error, Result};

static WATCH_PARAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"v=([^&]+)").expect("valid watch pattern"));
static SHORT_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"be/([^&]+)").expect("valid short-link pattern"));

/// A single captioned segment
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Captions for one video in one language
#[derive(Debug, Clone)]
pub struct Transcript {
    pub video_id: String,
    pub title: String,
    pub language: String,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Segment texts joined by single spaces
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Extract the video ID from a watch URL (`v=ID`) or a short link (`youtu.be/ID`).
///
/// The ID runs up to the next `&` or the end of the input. Scheme and host are
/// not checked.
pub fn extract_video_id(url: &str) -> Result<String> {
    let url = url.trim();

    WATCH_PARAM
        .captures(url)
        .or_else(|| SHORT_LINK.captures(url))
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_watch_url_stops_at_ampersand() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123&t=5s").unwrap(),
            "abc123"
        );
    }

    #[test]
    fn test_watch_url_param_not_first() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?list=PL1&v=abc123&index=2").unwrap(),
            "abc123"
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(extract_video_id("https://youtu.be/xyz789").unwrap(), "xyz789");
    }

    #[test]
    fn test_short_url_with_params() {
        assert_eq!(extract_video_id("https://youtu.be/xyz789&si=share").unwrap(), "xyz789");
    }

    #[test]
    fn test_watch_pattern_wins_over_short_link() {
        assert_eq!(extract_video_id("https://youtu.be/xyz789?v=abc123").unwrap(), "abc123");
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(extract_video_id("  https://youtu.be/xyz789\n").unwrap(), "xyz789");
    }

    #[test]
    fn test_invalid_url() {
        let err = extract_video_id("https://example.com/video").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(ref u) if u == "https://example.com/video"));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(extract_video_id(""), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        assert!(extract_video_id("https://www.youtube.com/watch?v=&t=5s").is_err());
    }

    #[test]
    fn test_transcript_text_joins_with_spaces() {
        let transcript = Transcript {
            video_id: "abc123".to_string(),
            title: String::new(),
            language: "en".to_string(),
            segments: vec![
                Segment {
                    text: "Hello world".to_string(),
                    start: 0.0,
                    duration: 1.5,
                },
                Segment {
                    text: "again".to_string(),
                    start: 1.5,
                    duration: 0.5,
                },
            ],
        };
        assert_eq!(transcript.text(), "Hello world again");
    }
}
