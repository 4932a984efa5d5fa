use std::path::Path;
use std::sync::{Arc, Mutex};

use summary_pulse::yt::AudioFetcher;

#[derive(Clone)]
pub struct MockAudioFetcher {
    /// Extension of the file "downloaded" into the scratch dir. Something
    /// other than mp3 simulates yt-dlp skipping the transcode step.
    pub extension: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
    /// When true, report success without writing any file.
    pub write_nothing: bool,
}

impl Default for MockAudioFetcher {
    fn default() -> Self {
        Self {
            extension: "mp3".to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            write_nothing: false,
        }
    }
}

impl MockAudioFetcher {
    pub fn with_extension(extension: &str) -> Self {
        Self {
            extension: extension.to_string(),
            ..Default::default()
        }
    }

    pub fn writing_nothing() -> Self {
        Self {
            write_nothing: true,
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl AudioFetcher for MockAudioFetcher {
    type Error = anyhow::Error;

    async fn fetch_audio(&self, video_id: &str, scratch_dir: &Path) -> Result<(), Self::Error> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        if !self.write_nothing {
            std::fs::create_dir_all(scratch_dir)?;
            let path = scratch_dir.join(format!("{video_id}.{}", self.extension));
            std::fs::write(path, b"fake audio")?;
        }
        Ok(())
    }
}
