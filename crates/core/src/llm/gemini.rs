use crate::config::Settings;
use crate::error::{RemoteError, Service};
use crate::llm::{Provider, TextGenerator};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemma-3-4b-it";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Client for the Google Generative Language `generateContent` endpoint.
///
/// Built without a credential it stays usable: every call fails with a `RemoteError`
/// before touching the network, which sends callers down their fallback path.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.google_ai_api_key.clone();
        if api_key.is_none() {
            tracing::warn!("GOOGLE_AI_API_KEY not set; AI analyses will use fallback content");
        }

        let base_url =
            std::env::var("GOOGLE_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("GOOGLE_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout_secs = std::env::var("GOOGLE_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
            model,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate_content(
        &self,
        req: &GenerateContentRequest<'_>,
    ) -> anyhow::Result<GenerateContentResponse> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(RemoteError {
                service: Service::GoogleAi,
                stage: "credentials",
                status: None,
                detail: "GOOGLE_AI_API_KEY is not configured".to_string(),
                body: None,
            }
            .into());
        };

        let res = self
            .http
            .post(self.url())
            .query(&[("key", api_key)])
            .json(req)
            .send()
            .await
            .map_err(|err| RemoteError {
                service: Service::GoogleAi,
                stage: "request",
                status: None,
                detail: format!("generateContent request failed: {err}"),
                body: None,
            })?;

        let status = res.status();
        let text = res.text().await.map_err(|err| RemoteError {
            service: Service::GoogleAi,
            stage: "body",
            status: Some(status.as_u16()),
            detail: format!("failed to read generateContent response: {err}"),
            body: None,
        })?;
        if !status.is_success() {
            return Err(RemoteError {
                service: Service::GoogleAi,
                stage: "http",
                status: Some(status.as_u16()),
                detail: format!("status={status}"),
                body: Some(text),
            }
            .into());
        }

        let parsed = serde_json::from_str::<GenerateContentResponse>(&text).map_err(|err| {
            RemoteError {
                service: Service::GoogleAi,
                stage: "decode",
                status: Some(status.as_u16()),
                detail: format!("failed to decode generateContent response: {err}"),
                body: Some(text.clone()),
            }
        })?;
        Ok(parsed)
    }

    fn response_text(res: &GenerateContentResponse) -> Option<String> {
        let candidate = res.candidates.first()?;
        let text = candidate
            .content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n");
        if text.trim().is_empty() {
            return None;
        }
        Some(text)
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::GoogleAi
    }

    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let req = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let res = self.generate_content(&req).await?;
        let text = Self::response_text(&res).ok_or_else(|| RemoteError {
            service: Service::GoogleAi,
            stage: "response",
            status: None,
            detail: "no candidate text in generateContent response".to_string(),
            body: None,
        })?;

        tracing::debug!(model = %self.model, reply_len = text.len(), "generateContent reply received");
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}
