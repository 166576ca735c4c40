use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{
    ContentPart, GenerationRequest, GenerationResponse, GenerativeClient, GroundingSource,
};
use super::{AuditError, ServiceError};
use crate::config::ServiceConfig;

const JSON_MIME_TYPE: &str = "application/json";
const CONNECT_TIMEOUT_SECS: u64 = 15;

/// HTTP client for the `generateContent` REST endpoint.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: ServiceConfig) -> Result<Self, AuditError> {
        if config.api_key.trim().is_empty() {
            return Err(AuditError::Config(format!(
                "no API key: set {} or {}",
                crate::config::API_KEY_ENV,
                crate::config::API_KEY_FALLBACK_ENV
            )));
        }

        // No overall request timeout: the dispatch cascade owns the deadline.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AuditError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

// ──────────────────────────────────────────────
// Wire types
// ──────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
}

#[derive(Serialize)]
struct WireContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<WirePart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum WirePart {
    #[serde(rename = "text")]
    Text(String),
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: String,
        data: String,
    },
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct GroundingMetadata {
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct GroundingChunk {
    web: Option<GroundingSource>,
}

fn build_body(request: &GenerationRequest) -> GenerateContentRequest {
    let parts = request
        .parts
        .iter()
        .map(|part| match part {
            ContentPart::Text(text) => WirePart::Text(text.clone()),
            ContentPart::InlineData { mime_type, data } => WirePart::InlineData {
                mime_type: mime_type.clone(),
                data: data.clone(),
            },
        })
        .collect();

    let generation_config = if request.temperature.is_some() || request.schema.is_some() {
        Some(WireGenerationConfig {
            temperature: request.temperature,
            response_mime_type: request.schema.as_ref().map(|_| JSON_MIME_TYPE),
            response_schema: request.schema.as_ref().map(|s| s.to_wire()),
        })
    } else {
        None
    };

    let tools = if request.web_search {
        vec![serde_json::json!({ "googleSearch": {} })]
    } else {
        Vec::new()
    };

    GenerateContentRequest {
        contents: vec![WireContent {
            role: Some("user"),
            parts,
        }],
        system_instruction: request.system_instruction.as_ref().map(|text| WireContent {
            role: None,
            parts: vec![WirePart::Text(text.clone())],
        }),
        generation_config,
        tools,
    }
}

/// First candidate's text parts, concatenated, plus its web sources.
fn into_response(parsed: GenerateContentResponse) -> GenerationResponse {
    let Some(candidate) = parsed.candidates.into_iter().next() else {
        return GenerationResponse::default();
    };

    let text = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default();

    let sources = candidate
        .grounding_metadata
        .map(|m| m.grounding_chunks.into_iter().filter_map(|c| c.web).collect())
        .unwrap_or_default();

    GenerationResponse { text, sources }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ServiceError> {
        let body = build_body(request);

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ServiceError::Connection(self.base_url.clone())
                } else {
                    ServiceError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::ResponseParsing(e.to_string()))?;

        Ok(into_response(parsed))
    }
}

// ──────────────────────────────────────────────
// Scripted client
// ──────────────────────────────────────────────

/// Scripted behavior for one model.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    WithSources(String, Vec<GroundingSource>),
    Fail(ServiceError),
    /// Sleep, then behave like the inner reply.
    Delayed(Duration, Box<MockReply>),
}

impl MockReply {
    pub fn text(text: &str) -> Self {
        MockReply::Text(text.to_string())
    }

    pub fn delayed(self, delay: Duration) -> Self {
        MockReply::Delayed(delay, Box::new(self))
    }
}

/// In-process client answering from a per-model script. Records every call.
pub struct MockClient {
    default_reply: MockReply,
    replies: HashMap<String, MockReply>,
    calls: Mutex<Vec<(String, GenerationRequest)>>,
    completed: AtomicUsize,
}

impl MockClient {
    pub fn new(response: &str) -> Self {
        Self::with_default(MockReply::text(response))
    }

    pub fn failing(error: ServiceError) -> Self {
        Self::with_default(MockReply::Fail(error))
    }

    pub fn with_default(reply: MockReply) -> Self {
        Self {
            default_reply: reply,
            replies: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            completed: AtomicUsize::new(0),
        }
    }

    pub fn with_model(mut self, model: &str, reply: MockReply) -> Self {
        self.replies.insert(model.to_string(), reply);
        self
    }

    /// Models called so far, in call order.
    pub fn models_called(&self) -> Vec<String> {
        self.lock_calls().iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.lock_calls().iter().map(|(_, r)| r.clone()).collect()
    }

    /// Calls that ran to the end of their script, including ones nobody awaited.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<(String, GenerationRequest)>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl GenerativeClient for MockClient {
    async fn generate(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ServiceError> {
        self.lock_calls().push((model.to_string(), request.clone()));

        let mut reply = self
            .replies
            .get(model)
            .unwrap_or(&self.default_reply)
            .clone();

        while let MockReply::Delayed(delay, inner) = reply {
            tokio::time::sleep(delay).await;
            reply = *inner;
        }

        self.completed.fetch_add(1, Ordering::SeqCst);
        match reply {
            MockReply::Text(text) => Ok(GenerationResponse::from_text(text)),
            MockReply::WithSources(text, sources) => Ok(GenerationResponse { text, sources }),
            MockReply::Fail(error) => Err(error),
            MockReply::Delayed(..) => Err(ServiceError::Aborted("unreachable script".into())),
        }
    }
}
