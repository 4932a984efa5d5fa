use reqwest::Client;
use serde::Deserialize;

use crate::llm::summarizer::{build_analysis_prompt, build_collection_prompt};
use crate::types::{Analysis, CollectionSummary};
use crate::Summarizer;

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("no content in response")]
    EmptyResponse,
    #[error("malformed JSON reply: {0}")]
    MalformedReply(#[from] serde_json::Error),
}

impl GeminiClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Single best-effort generation call requesting a JSON-typed reply.
    /// No retry or caching at this layer.
    async fn send_generate_request(&self, prompt: String) -> Result<String, GeminiError> {
        let body = serde_json::json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ],
            "generationConfig": {
                "responseMimeType": "application/json"
            }
        });

        let resp = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url,
                Self::SUMMARIZER_MODEL
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, message });
        }

        let response = resp.json::<GenerateContentResponse>().await?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or(GeminiError::EmptyResponse)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Models sometimes wrap JSON replies in a markdown code fence even when a
/// JSON mime type was requested.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

impl Summarizer for GeminiClient {
    const SUMMARIZER_MODEL: &str = "gemini-flash-latest";

    type Error = GeminiError;

    async fn summarize(
        &self,
        title: impl Into<String> + Send,
        content: impl Into<String> + Send,
    ) -> Result<Analysis, GeminiError> {
        let prompt = build_analysis_prompt(&title.into(), &content.into());
        let reply = self
            .send_generate_request(prompt)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize content"))?;

        let analysis: Analysis = serde_json::from_str(strip_code_fence(&reply))?;

        // exactly-3 blocks is asked of the model, not enforced; a short or
        // long reply is still usable downstream
        if analysis.newsletter_summary.len() != 3 {
            tracing::warn!(
                blocks = analysis.newsletter_summary.len(),
                "Newsletter summary did not come back with 3 blocks"
            );
        }

        Ok(analysis)
    }

    async fn summarize_collection(
        &self,
        items: &[String],
    ) -> Result<CollectionSummary, GeminiError> {
        let prompt = build_collection_prompt(items);
        let reply = self
            .send_generate_request(prompt)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize collection"))?;

        Ok(serde_json::from_str(strip_code_fence(&reply))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generate_reply(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [
                {
                    "content": {
                        "parts": [ { "text": text } ]
                    }
                }
            ]
        })
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_summarize_parses_analysis_reply() {
        let server = MockServer::start().await;

        let analysis = serde_json::json!({
            "category": "IT/과학",
            "topic": "인공지능",
            "small_card_summary": "AI 모델 공개",
            "medium_card_summary": "새 모델이 공개되었다. 성능이 좋아졌다.",
            "newsletter_summary": [
                {"title": "배경", "content": "..."},
                {"title": "핵심", "content": "..."},
                {"title": "전망", "content": "..."}
            ]
        });

        Mock::given(method("POST"))
            .and(path("/models/gemini-flash-latest:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(generate_reply(&analysis.to_string())),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(Client::new(), "test-key").with_base_url(server.uri());
        let result = client.summarize("제목", "본문").await.unwrap();

        assert_eq!(result.category, "IT/과학");
        assert_eq!(result.topic, "인공지능");
        assert_eq!(result.newsletter_summary.len(), 3);
    }

    #[tokio::test]
    async fn test_summarize_tolerates_code_fenced_reply() {
        let server = MockServer::start().await;

        let fenced = "```json\n{\"category\": \"경제\", \"topic\": \"주식/투자\"}\n```";
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(generate_reply(fenced)))
            .mount(&server)
            .await;

        let client = GeminiClient::new(Client::new(), "test-key").with_base_url(server.uri());
        let result = client.summarize("제목", "본문").await.unwrap();

        assert_eq!(result.category, "경제");
        // unlisted fields fall back to serde defaults
        assert!(result.newsletter_summary.is_empty());
    }

    #[tokio::test]
    async fn test_api_failure_is_typed_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(Client::new(), "bad-key").with_base_url(server.uri());
        let err = client.summarize("제목", "본문").await.unwrap_err();

        match err {
            GeminiError::Api { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("API key not valid"));
            }
            other => panic!("expected Api error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_reply_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(generate_reply("죄송하지만 요약할 수 없습니다")),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new(Client::new(), "test-key").with_base_url(server.uri());
        let err = client.summarize("제목", "본문").await.unwrap_err();
        assert!(matches!(err, GeminiError::MalformedReply(_)));
    }

    #[tokio::test]
    async fn test_summarize_collection_parses_reply() {
        let server = MockServer::start().await;

        let collection = serde_json::json!({
            "small_card_summary": "이번 주 테크 모음",
            "medium_card_summary": "AI와 인프라 소식을 묶은 모음입니다."
        });
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(generate_reply(&collection.to_string())),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new(Client::new(), "test-key").with_base_url(server.uri());
        let items = vec!["AI 뉴스".to_string(), "인프라 뉴스".to_string()];
        let result = client.summarize_collection(&items).await.unwrap();

        assert_eq!(result.small_card_summary, "이번 주 테크 모음");
    }
}
