use async_trait::async_trait;
use log::{debug, warn};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, Segment, Transcript};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const INNERTUBE_CLIENT_VERSION: &str = "2.20241126.01.00";

/// Anything that can hand back captions for a video in one of the given languages.
#[async_trait]
pub trait TranscriptService: Send + Sync {
    /// Fetch captions for `video_id`. `languages` is an ordered preference list;
    /// only tracks matching one of its codes exactly are acceptable.
    async fn fetch(&self, video_id: &str, languages: &[&str]) -> Result<Transcript>;
}

/// Which primary-language failures trigger the fallback request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackMode {
    /// Any error from the primary attempt
    #[default]
    AnyError,
    /// Only a missing caption track; network and service errors propagate
    MissingCaptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePolicy {
    pub primary: String,
    pub fallback: String,
    pub fallback_mode: FallbackMode,
}

/// Fetch captions in the primary language, retrying once in the fallback language.
///
/// Only the fallback attempt's failure is reported, wrapped as
/// [`Error::TranscriptUnavailable`].
pub async fn fetch_transcript<S>(service: &S, video_id: &str, policy: &LanguagePolicy) -> Result<Transcript>
where
    S: TranscriptService + ?Sized,
{
    let primary_err = match service.fetch(video_id, &[policy.primary.as_str()]).await {
        Ok(transcript) => return Ok(transcript),
        Err(e) => e,
    };

    if policy.fallback_mode == FallbackMode::MissingCaptions && !primary_err.is_no_captions() {
        return Err(primary_err);
    }
    warn!(
        "Captions in '{}' failed for {video_id}: {primary_err}; trying '{}'",
        policy.primary, policy.fallback
    );

    service
        .fetch(video_id, &[policy.fallback.as_str()])
        .await
        .map_err(|e| Error::TranscriptUnavailable {
            video_id: video_id.to_string(),
            primary: policy.primary.clone(),
            fallback: policy.fallback.clone(),
            source: Box::new(e),
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    captions: Option<Captions>,
    video_details: Option<VideoDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoDetails {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
}

impl PlayerResponse {
    fn title(&self) -> String {
        self.video_details
            .as_ref()
            .and_then(|vd| vd.title.clone())
            .unwrap_or_default()
    }

    fn into_tracks(self) -> Vec<CaptionTrack> {
        self.captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .map(|r| r.caption_tracks)
            .unwrap_or_default()
    }
}

/// YouTube's own captions, read through the InnerTube player API
pub struct InnerTubeClient {
    client: reqwest::Client,
}

impl InnerTubeClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn api_key(&self, video_id: &str) -> Result<String> {
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        debug!("Fetching watch page: {watch_url}");

        let html = self
            .client
            .get(&watch_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        extract_api_key(&html)
    }

    async fn player(&self, video_id: &str, api_key: &str, hl: &str) -> Result<PlayerResponse> {
        let player_url = format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");
        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": hl,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": INNERTUBE_CLIENT_VERSION
                }
            },
            "videoId": video_id
        });

        let resp: PlayerResponse = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp)
    }

    async fn segments(&self, track: &CaptionTrack) -> Result<Vec<Segment>> {
        debug!("Fetching caption track: lang={}", track.language_code);
        let xml = self
            .client
            .get(&track.base_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_caption_xml(&xml)
    }
}

#[async_trait]
impl TranscriptService for InnerTubeClient {
    async fn fetch(&self, video_id: &str, languages: &[&str]) -> Result<Transcript> {
        let api_key = self.api_key(video_id).await?;
        let hl = languages.first().copied().unwrap_or("en");
        let player = self.player(video_id, &api_key, hl).await?;

        let title = player.title();
        let tracks = player.into_tracks();
        debug!(
            "Video {video_id} offers captions in: {}",
            tracks.iter().map(|t| t.language_code.as_str()).collect::<Vec<_>>().join(", ")
        );

        let track = select_track(&tracks, languages).ok_or_else(|| Error::NoCaptions {
            video_id: video_id.to_string(),
            lang: languages.join(","),
        })?;
        let segments = self.segments(track).await?;

        Ok(Transcript {
            video_id: video_id.to_string(),
            title,
            language: track.language_code.clone(),
            segments,
        })
    }
}

/// First track matching the preference list, in preference order
fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[&str]) -> Option<&'a CaptionTrack> {
    languages
        .iter()
        .find_map(|lang| tracks.iter().find(|t| t.language_code == *lang))
}

fn extract_api_key(html: &str) -> Result<String> {
    let patterns = [
        r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#,
        r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#,
    ];
    for pattern in patterns {
        if let Some(caps) = Regex::new(pattern)?.captures(html) {
            return Ok(caps[1].to_string());
        }
    }
    Err(Error::Service("could not extract InnerTube API key from watch page".to_string()))
}

fn attr_f64(element: &BytesStart, name: &[u8]) -> Option<f64> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .and_then(|attr| String::from_utf8_lossy(&attr.value).parse().ok())
}

/// Parse timedtext XML (`<text start=".." dur="..">..</text>`) into segments.
fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>> {
    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut timing: Option<(f64, f64)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                timing = attr_f64(e, b"start").zip(attr_f64(e, b"dur"));
            }
            Ok(Event::Text(ref e)) => {
                let Some((start, duration)) = timing.take() else {
                    continue;
                };
                let raw = e.unescape().unwrap_or_default();
                // captions are entity-encoded twice
                let text = html_escape::decode_html_entities(&raw).into_owned();
                if !text.is_empty() {
                    segments.push(Segment { text, start, duration });
                }
            }
            Ok(Event::End(_)) => timing = None,
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Service(format!("error parsing caption XML: {e}"))),
            _ => {}
        }
    }

    Ok(segments)
}
