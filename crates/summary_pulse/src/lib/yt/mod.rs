pub mod audio;
pub mod captions;
pub mod metadata;

use std::fmt::Display;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::VideoError;
use crate::llm::transcriber::Transcriber;
use crate::types::{TranscriptSource, VideoData};

pub use audio::YtDlpAudio;
pub use metadata::YtDlpSource;

/// Full video metadata plus the caption catalog, fetched without
/// downloading any media.
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub duration_seconds: u64,
    pub description: String,
    pub thumbnail_url: String,
    pub channel: String,
    pub caption_tracks: Vec<CaptionTrack>,
}

/// One entry in a video's caption catalog.
#[derive(Debug, Clone)]
pub struct CaptionTrack {
    pub language: String,
    pub url: String,
    pub auto_generated: bool,
}

pub trait VideoSource {
    type Error: Display;

    fn fetch_metadata(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<VideoMetadata, Self::Error>> + Send;
}

pub trait AudioFetcher {
    type Error: Display;

    /// Downloads the best audio stream for `video_id` into `scratch_dir`,
    /// named by video id.
    fn fetch_audio(
        &self,
        video_id: &str,
        scratch_dir: &Path,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Extracts video metadata and a transcript. Official captions are
/// near-instant and free of recognition error, so they are always tried
/// first; speech recognition over downloaded audio is the expensive
/// fallback.
#[derive(Debug)]
pub struct VideoExtractor<V, A, T> {
    source: V,
    audio: A,
    transcriber: T,
    http_client: reqwest::Client,
    scratch_dir: PathBuf,
    languages: Vec<String>,
}

impl<V, A, T> VideoExtractor<V, A, T>
where
    V: VideoSource + Send + Sync,
    A: AudioFetcher + Send + Sync,
    T: Transcriber + Send + Sync,
{
    pub fn new(
        source: V,
        audio: A,
        transcriber: T,
        http_client: reqwest::Client,
        scratch_dir: impl Into<PathBuf>,
        languages: Vec<String>,
    ) -> Self {
        VideoExtractor {
            source,
            audio,
            transcriber,
            http_client,
            scratch_dir: scratch_dir.into(),
            languages,
        }
    }

    /// Runs the extraction state machine: metadata, caption attempt, then
    /// audio download + speech recognition. The transcript comes from
    /// exactly one of the two sources; on any failure no partial
    /// [`VideoData`] is returned.
    #[tracing::instrument(skip(self))]
    pub async fn extract(&self, url: &str) -> Result<VideoData, VideoError> {
        let meta = self
            .source
            .fetch_metadata(url)
            .await
            .map_err(|e| VideoError::Metadata(e.to_string()))?;

        tracing::info!(video_id = %meta.video_id, title = %meta.title, "Checking official captions");
        if let Some(transcript) = self.try_captions(&meta).await {
            tracing::info!(video_id = %meta.video_id, "Official caption extraction succeeded");
            return Ok(video_data(meta, transcript, TranscriptSource::Caption));
        }

        tracing::info!(
            video_id = %meta.video_id,
            "No usable captions, falling back to speech recognition"
        );
        let transcript = self.transcribe_audio(&meta.video_id).await?;
        Ok(video_data(meta, transcript, TranscriptSource::SpeechRecognition))
    }

    /// Best-effort caption fetch. Any failure here is soft: it logs and
    /// yields `None` so the audio fallback can take over.
    async fn try_captions(&self, meta: &VideoMetadata) -> Option<String> {
        let track = captions::pick_track(&meta.caption_tracks, &self.languages)?;

        let xml = match self.fetch_caption_xml(&track.url).await {
            Ok(xml) => xml,
            Err(e) => {
                tracing::warn!(language = %track.language, error = %e, "Caption track fetch failed");
                return None;
            }
        };

        match captions::parse_caption_xml(&xml) {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => {
                tracing::warn!(language = %track.language, "Caption track was empty");
                None
            }
            Err(e) => {
                tracing::warn!(language = %track.language, error = %e, "Caption track parse failed");
                None
            }
        }
    }

    async fn fetch_caption_xml(&self, track_url: &str) -> Result<String, VideoError> {
        self.http_client
            .get(track_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| VideoError::Metadata(e.to_string()))?
            .text()
            .await
            .map_err(|e| VideoError::Metadata(e.to_string()))
    }

    /// Audio fallback: download, locate the scratch file, transcribe, and
    /// delete the scratch file however transcription went, to bound local
    /// disk usage across requests.
    async fn transcribe_audio(&self, video_id: &str) -> Result<String, VideoError> {
        self.audio
            .fetch_audio(video_id, &self.scratch_dir)
            .await
            .map_err(|e| VideoError::AudioDownload(e.to_string()))?;

        let audio_path = locate_scratch_audio(&self.scratch_dir, video_id)?;

        let result = self.transcriber.transcribe(&audio_path).await;

        if let Err(e) = std::fs::remove_file(&audio_path) {
            tracing::warn!(path = %audio_path.display(), error = %e, "Failed to remove scratch audio");
        }

        let response = result.map_err(|e| VideoError::Transcription(e.to_string()))?;
        Ok(response.text)
    }
}

/// Locates the downloaded scratch file. The exact expected name is tried
/// first; if transcoding to the expected container did not happen, any
/// file whose name starts with the video id is accepted instead.
pub(crate) fn locate_scratch_audio(
    scratch_dir: &Path,
    video_id: &str,
) -> Result<PathBuf, VideoError> {
    let expected = scratch_dir.join(format!("{video_id}.mp3"));
    if expected.exists() {
        return Ok(expected);
    }

    let entries = match std::fs::read_dir(scratch_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read scratch directory");
            return Err(VideoError::AudioFileMissing(expected));
        }
    };
    for entry in entries.flatten() {
        if entry.file_name().to_string_lossy().starts_with(video_id) {
            tracing::debug!(
                path = %entry.path().display(),
                "Using scratch file with unexpected extension"
            );
            return Ok(entry.path());
        }
    }

    Err(VideoError::AudioFileMissing(expected))
}

fn video_data(meta: VideoMetadata, transcript: String, source: TranscriptSource) -> VideoData {
    VideoData {
        video_id: meta.video_id,
        title: meta.title,
        duration_seconds: meta.duration_seconds,
        description: meta.description,
        thumbnail_url: meta.thumbnail_url,
        channel: meta.channel,
        transcript,
        transcript_source: source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("summary-pulse-{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_locate_exact_name() {
        let dir = scratch("locate-exact");
        std::fs::write(dir.join("abc123.mp3"), b"audio").unwrap();

        let located = locate_scratch_audio(&dir, "abc123").unwrap();
        assert_eq!(located, dir.join("abc123.mp3"));
    }

    #[test]
    fn test_locate_falls_back_to_prefix_scan() {
        let dir = scratch("locate-prefix");
        std::fs::write(dir.join("abc123.webm"), b"audio").unwrap();
        std::fs::write(dir.join("unrelated.mp3"), b"audio").unwrap();

        let located = locate_scratch_audio(&dir, "abc123").unwrap();
        assert_eq!(located, dir.join("abc123.webm"));
    }

    #[test]
    fn test_locate_missing_is_hard_error() {
        let dir = scratch("locate-missing");
        let err = locate_scratch_audio(&dir, "abc123").unwrap_err();
        assert!(matches!(err, VideoError::AudioFileMissing(_)));
    }
}
