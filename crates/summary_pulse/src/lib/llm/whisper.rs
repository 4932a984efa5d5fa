//! Local speech recognition via the whisper.cpp CLI.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::llm::transcriber::{TranscribeResponse, Transcriber};

#[derive(Debug, thiserror::Error)]
pub enum WhisperError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ffmpeg exited with {status}: {stderr}")]
    Ffmpeg { status: String, stderr: String },
    #[error("whisper exited with {status}: {stderr}")]
    Whisper { status: String, stderr: String },
    #[error("invalid audio path: {}", .0.display())]
    InvalidPath(PathBuf),
}

/// Paths and language for the local recognition toolchain. The model file
/// decides the speed/accuracy tradeoff; the default deployment ships the
/// smallest variant because transcription sits on the request path.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    pub whisper_bin: PathBuf,
    pub model_path: PathBuf,
    pub ffmpeg_bin: PathBuf,
    pub language: String,
}

/// Transcriber backed by a whisper.cpp binary. Audio is first resampled to
/// 16 kHz mono wav with ffmpeg, which is the only input format whisper.cpp
/// accepts reliably.
#[derive(Debug, Clone)]
pub struct WhisperCpp {
    config: WhisperConfig,
}

impl WhisperCpp {
    pub fn new(config: WhisperConfig) -> Self {
        WhisperCpp { config }
    }

    async fn convert_to_wav(&self, audio_path: &Path) -> Result<PathBuf, WhisperError> {
        let wav_path = audio_path.with_extension("wav");

        let output = Command::new(&self.config.ffmpeg_bin)
            .arg("-y")
            .args(["-loglevel", "error"])
            .arg("-i")
            .arg(audio_path)
            .args(["-ar", "16000", "-ac", "1"])
            .arg(&wav_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            // ffmpeg can flush a truncated wav before exiting
            if wav_path.exists() {
                if let Err(e) = std::fs::remove_file(&wav_path) {
                    tracing::warn!(path = %wav_path.display(), error = %e, "Failed to remove partial wav file");
                }
            }
            return Err(WhisperError::Ffmpeg {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(wav_path)
    }

    async fn run_whisper(&self, wav_path: &Path) -> Result<String, WhisperError> {
        let output = Command::new(&self.config.whisper_bin)
            .arg("-m")
            .arg(&self.config.model_path)
            .args(["-l", &self.config.language])
            .args(["--vad", "--no-timestamps"])
            .arg("-f")
            .arg(wav_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(WhisperError::Whisper {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(text)
    }
}

impl Transcriber for WhisperCpp {
    type Error = WhisperError;

    async fn transcribe(&self, audio_path: &Path) -> Result<TranscribeResponse, WhisperError> {
        tracing::info!(path = %audio_path.display(), "Starting local speech recognition");
        if !audio_path.is_file() {
            return Err(WhisperError::InvalidPath(audio_path.to_path_buf()));
        }

        let wav_path = self.convert_to_wav(audio_path).await?;

        let result = self.run_whisper(&wav_path).await;

        if let Err(e) = std::fs::remove_file(&wav_path) {
            tracing::warn!(path = %wav_path.display(), error = %e, "Failed to remove wav file");
        }

        Ok(TranscribeResponse {
            text: result?,
            language: self.config.language.clone(),
        })
    }
}
