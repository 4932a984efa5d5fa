use std::sync::{Arc, Mutex};

use summary_pulse::yt::{CaptionTrack, VideoMetadata, VideoSource};

#[derive(Clone)]
pub struct MockVideoSource {
    pub caption_tracks: Vec<CaptionTrack>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockVideoSource {
    pub fn without_captions() -> Self {
        Self {
            caption_tracks: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn with_caption_track(language: &str, url: &str) -> Self {
        Self {
            caption_tracks: vec![CaptionTrack {
                language: language.to_string(),
                url: url.to_string(),
                auto_generated: false,
            }],
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            caption_tracks: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl VideoSource for MockVideoSource {
    type Error = anyhow::Error;

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, Self::Error> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(VideoMetadata {
            video_id: "vid12345678".to_string(),
            title: "테스트 영상".to_string(),
            duration_seconds: 300,
            description: "영상 설명".to_string(),
            thumbnail_url: "https://i.ytimg.example/vid12345678/hq720.jpg".to_string(),
            channel: "테스트 채널".to_string(),
            caption_tracks: self.caption_tracks.clone(),
        })
    }
}
