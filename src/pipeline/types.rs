use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::schema::Schema;
use super::ServiceError;

/// One piece of a request's content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    /// Base64 payload with its media type.
    InlineData { mime_type: String, data: String },
}

/// Everything a single model call needs besides the model id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub parts: Vec<ContentPart>,
    pub system_instruction: Option<String>,
    pub temperature: Option<f32>,
    /// When set the service is asked for JSON matching this shape.
    pub schema: Option<Schema>,
    /// Enables the web search tool.
    pub web_search: bool,
}

impl GenerationRequest {
    pub fn prompt(text: impl Into<String>) -> Self {
        Self::from_parts(vec![ContentPart::Text(text.into())])
    }

    pub fn from_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            parts,
            ..Self::default()
        }
    }

    pub fn with_system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }

    pub fn expects_json(&self) -> bool {
        self.schema.is_some()
    }
}

/// Web page the service consulted while answering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: Option<String>,
    pub uri: Option<String>,
}

/// Raw answer of one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResponse {
    /// Concatenated candidate text; empty when the service produced none.
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

impl GenerationResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
        }
    }
}

/// Abstraction over the generative text service.
///
/// Implementations are shared across tasks through `Arc<dyn GenerativeClient>`.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ServiceError>;
}
