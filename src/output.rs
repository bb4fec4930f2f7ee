use indicatif::{ProgressBar, ProgressStyle};

use crate::Transcript;

/// Labelled transcript section: segment texts on one line, space separated
pub fn render_transcript(transcript: &Transcript) -> String {
    format!("\nTranscript of the video:\n\n{}\n", transcript.text())
}

/// Printed before summarizing starts; the summary follows on the next line
pub const SUMMARY_HEADER: &str = "Summary of the video:";

/// Per-chunk progress on stderr; hidden when stderr is not a terminal.
pub fn summary_progress() -> ProgressBar {
    let pb = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} Summarizing [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Segment;

    fn sample_transcript() -> Transcript {
        Transcript {
            video_id: "abc123".to_string(),
            title: "Test Video".to_string(),
            language: "en".to_string(),
            segments: vec![
                Segment {
                    text: "Hello world".to_string(),
                    start: 0.0,
                    duration: 1.5,
                },
                Segment {
                    text: "This is a test".to_string(),
                    start: 1.5,
                    duration: 2.0,
                },
            ],
        }
    }

    #[test]
    fn test_render_transcript() {
        assert_eq!(
            render_transcript(&sample_transcript()),
            "\nTranscript of the video:\n\nHello world This is a test\n"
        );
    }

    #[test]
    fn test_render_transcript_empty() {
        let mut t = sample_transcript();
        t.segments.clear();
        assert_eq!(render_transcript(&t), "\nTranscript of the video:\n\n\n");
    }

    #[test]
    fn test_summary_header_ends_transcript_block() {
        let printed = format!("{}\n{SUMMARY_HEADER}\n", render_transcript(&sample_transcript()));
        assert!(printed.ends_with("This is a test\n\nSummary of the video:\n"));
    }
}
