//! Audio download via yt-dlp, for the speech-recognition fallback.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::yt::metadata::YtDlpError;
use crate::yt::AudioFetcher;

const FORMAT_UNAVAILABLE: &str = "Requested format is not available";

/// Downloads the audio stream for a video into a scratch directory as
/// `{video_id}.mp3`. `bestaudio` is tried first and `best` on format
/// errors, mirroring the metadata probe.
#[derive(Debug, Clone, Default)]
pub struct YtDlpAudio {
    cookies_path: Option<PathBuf>,
}

impl YtDlpAudio {
    pub fn new(cookies_path: Option<PathBuf>) -> Self {
        YtDlpAudio { cookies_path }
    }

    async fn download(
        &self,
        video_id: &str,
        scratch_dir: &Path,
        format: &str,
    ) -> Result<(), YtDlpError> {
        let url = format!("https://youtube.com/watch?v={video_id}");
        let template = scratch_dir.join("%(id)s.%(ext)s");

        let mut cmd = Command::new("yt-dlp");
        cmd.args(["-f", format])
            .args(["--extract-audio", "--audio-format", "mp3"])
            .args(["--audio-quality", "192K"])
            .args(["--no-playlist", "--no-continue", "--force-overwrites"])
            .arg("-o")
            .arg(&template);
        if let Some(cookies) = &self.cookies_path {
            cmd.arg("--cookies").arg(cookies);
        }
        cmd.arg(&url);

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

        Ok(())
    }
}

impl AudioFetcher for YtDlpAudio {
    type Error = YtDlpError;

    async fn fetch_audio(&self, video_id: &str, scratch_dir: &Path) -> Result<(), YtDlpError> {
        std::fs::create_dir_all(scratch_dir)?;

        match self.download(video_id, scratch_dir, "bestaudio").await {
            Ok(()) => Ok(()),
            Err(YtDlpError::Failed { stderr, .. }) if stderr.contains(FORMAT_UNAVAILABLE) => {
                tracing::debug!(video_id, "No audio-only stream, retrying with combined format");
                self.download(video_id, scratch_dir, "best").await
            }
            Err(e) => Err(e),
        }
    }
}
