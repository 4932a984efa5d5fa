//! Video metadata via `yt-dlp --dump-json`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;

use crate::yt::{CaptionTrack, VideoMetadata, VideoSource};

const FORMAT_UNAVAILABLE: &str = "Requested format is not available";

#[derive(Debug, thiserror::Error)]
pub enum YtDlpError {
    #[error("failed to spawn yt-dlp: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("yt-dlp exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("failed to parse yt-dlp output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fetches metadata without downloading media. `--dump-json` is combined
/// with `-f bestaudio` so availability of an audio-only stream is probed
/// up front; when none exists the probe is retried with `best`.
#[derive(Debug, Clone, Default)]
pub struct YtDlpSource {
    cookies_path: Option<PathBuf>,
}

impl YtDlpSource {
    pub fn new(cookies_path: Option<PathBuf>) -> Self {
        YtDlpSource { cookies_path }
    }

    async fn dump_json(&self, url: &str, format: &str) -> Result<String, YtDlpError> {
        let mut cmd = Command::new("yt-dlp");
        cmd.args(["--dump-json", "--no-playlist", "--no-warnings", "-f", format]);
        if let Some(cookies) = &self.cookies_path {
            cmd.arg("--cookies").arg(cookies);
        }
        cmd.arg(url);

        let output = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(YtDlpError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VideoSource for YtDlpSource {
    type Error = YtDlpError;

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, YtDlpError> {
        let json = match self.dump_json(url, "bestaudio").await {
            Ok(json) => json,
            Err(YtDlpError::Failed { stderr, .. }) if stderr.contains(FORMAT_UNAVAILABLE) => {
                tracing::debug!(%url, "No audio-only stream, retrying with combined format");
                self.dump_json(url, "best").await?
            }
            Err(e) => return Err(e),
        };

        parse_metadata(&json)
    }
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    subtitles: HashMap<String, Vec<RawCaptionFormat>>,
    #[serde(default)]
    automatic_captions: HashMap<String, Vec<RawCaptionFormat>>,
}

#[derive(Debug, Deserialize)]
struct RawCaptionFormat {
    #[serde(default)]
    ext: String,
    #[serde(default)]
    url: String,
}

pub(crate) fn parse_metadata(json: &str) -> Result<VideoMetadata, YtDlpError> {
    let raw: RawMetadata = serde_json::from_str(json)?;

    let mut caption_tracks = Vec::new();
    collect_tracks(&raw.subtitles, false, &mut caption_tracks);
    collect_tracks(&raw.automatic_captions, true, &mut caption_tracks);

    Ok(VideoMetadata {
        video_id: raw.id,
        title: raw.title,
        duration_seconds: raw.duration.unwrap_or_default() as u64,
        description: raw.description,
        thumbnail_url: raw.thumbnail,
        channel: raw.channel.or(raw.uploader).unwrap_or_default(),
        caption_tracks,
    })
}

/// Flattens yt-dlp's per-language format lists into one track per
/// language, preferring the srv1 format (timed XML) over the others.
fn collect_tracks(
    catalog: &HashMap<String, Vec<RawCaptionFormat>>,
    auto_generated: bool,
    out: &mut Vec<CaptionTrack>,
) {
    for (language, formats) in catalog {
        let format = formats
            .iter()
            .find(|f| f.ext == "srv1")
            .or_else(|| formats.first());
        if let Some(format) = format {
            if !format.url.is_empty() {
                out.push(CaptionTrack {
                    language: language.clone(),
                    url: format.url.clone(),
                    auto_generated,
                });
            }
        }
    }
}
