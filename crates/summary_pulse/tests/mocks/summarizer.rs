use std::sync::{Arc, Mutex};

use summary_pulse::types::{Analysis, CollectionSummary, NewsletterBlock};
use summary_pulse::Summarizer;

#[derive(Clone)]
pub struct MockSummarizer {
    /// (title, content) pairs passed to `summarize`.
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
    pub collection_calls: Arc<Mutex<Vec<Vec<String>>>>,
    pub fail_with: Option<String>,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            collection_calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new()
        }
    }
}

impl Summarizer for MockSummarizer {
    const SUMMARIZER_MODEL: &str = "mock-gemini";

    type Error = anyhow::Error;

    async fn summarize(
        &self,
        title: impl Into<String> + Send,
        content: impl Into<String> + Send,
    ) -> Result<Analysis, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((title.into(), content.into()));
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(Analysis {
            category: "IT/과학".to_string(),
            topic: "인공지능".to_string(),
            small_card_summary: "짧은 요약".to_string(),
            medium_card_summary: "중간 길이 요약입니다.".to_string(),
            newsletter_summary: vec![
                NewsletterBlock {
                    title: "배경".to_string(),
                    content: "...".to_string(),
                },
                NewsletterBlock {
                    title: "핵심".to_string(),
                    content: "...".to_string(),
                },
                NewsletterBlock {
                    title: "전망".to_string(),
                    content: "...".to_string(),
                },
            ],
        })
    }

    async fn summarize_collection(
        &self,
        items: &[String],
    ) -> Result<CollectionSummary, Self::Error> {
        self.collection_calls.lock().unwrap().push(items.to_vec());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(CollectionSummary {
            small_card_summary: "테크 모음".to_string(),
            medium_card_summary: "테크 소식을 묶은 모음입니다.".to_string(),
        })
    }
}
