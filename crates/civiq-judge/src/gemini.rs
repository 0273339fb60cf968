//! Gemini API judge implementation.

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use civiq_core::error::JudgeError;
use civiq_core::traits::{AnswerJudge, JudgeRequest, JudgeVerdict, JUDGE_INSTRUCTION};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Judge backed by the Gemini `generateContent` endpoint.
pub struct GeminiJudge {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiJudge {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        model: Option<String>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

fn text_content(role: Option<&str>, text: &str) -> GeminiContent {
    GeminiContent {
        role: role.map(str::to_string),
        parts: vec![GeminiPart {
            text: text.to_string(),
        }],
    }
}

#[async_trait]
impl AnswerJudge for GeminiJudge {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn judge(&self, request: &JudgeRequest) -> anyhow::Result<JudgeVerdict> {
        let start = Instant::now();

        let body = GeminiRequest {
            system_instruction: text_content(None, JUDGE_INSTRUCTION),
            contents: vec![text_content(Some("user"), &request.prompt())],
            generation_config: GenerationConfig { temperature: 0.0 },
        };

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    JudgeError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    JudgeError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(JudgeError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(JudgeError::ModelNotFound(self.model.clone()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(JudgeError::ApiError { status, message }.into());
        }

        let api_response: GeminiResponse =
            response.json().await.map_err(|e| JudgeError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        let reply = api_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .unwrap_or_default();

        let verdict = JudgeVerdict::from_reply(reply, start.elapsed().as_millis() as u64);
        tracing::debug!(correct = ?verdict.correct, "judge replied");
        Ok(verdict)
    }
}
