//! Google Gemini provider over the `generateContent` endpoint.

use std::sync::Arc;

use dcommon::SecretString;
use serde::{Deserialize, Serialize};

use crate::{
    Completion, HttpAuth, HttpRequest, HttpTransport, ModelProvider, Prompt, ProviderConfig,
    ProviderError, ProviderFuture, ProviderKind, TokenUsage,
};

use super::{endpoint, error_from_response, parse_json};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const GEMINI_MAX_OUTPUT_TOKENS: u32 = 8192;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiProvider {
    transport: Arc<dyn HttpTransport>,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            api_key: SecretString::new(api_key),
            base_url: GEMINI_BASE_URL.to_string(),
            model: GEMINI_DEFAULT_MODEL.to_string(),
        }
    }

    pub fn from_config(config: &ProviderConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let mut provider = Self::new(config.api_key.expose(), transport);
        if let Some(base_url) = &config.base_url {
            provider = provider.with_base_url(base_url.clone());
        }
        if let Some(model) = &config.model {
            provider = provider.with_model(model.clone());
        }
        provider
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub(crate) fn build_request(&self, prompt: &Prompt) -> Result<HttpRequest, ProviderError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: &prompt.text }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: prompt.clamped_budget(GEMINI_MAX_OUTPUT_TOKENS),
            },
        };
        let body = serde_json::to_value(body)
            .map_err(|err| ProviderError::invalid_request(err.to_string()))?;
        let path = format!("models/{}:generateContent", self.model);

        Ok(
            HttpRequest::post(endpoint(&self.base_url, &path), body).with_auth(HttpAuth::Header {
                name: API_KEY_HEADER,
                value: self.api_key.clone(),
            }),
        )
    }

    fn into_completion(
        &self,
        response: GenerateContentResponse,
    ) -> Result<Completion, ProviderError> {
        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(ProviderError::invalid_request(format!(
                "gemini blocked the prompt: {reason}"
            )));
        }

        let candidate = response.candidates.into_iter().next().ok_or_else(|| {
            ProviderError::malformed_response("gemini response did not include candidates")
        })?;

        let content: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ProviderError::malformed_response(
                "gemini response did not include text",
            ));
        }

        Ok(Completion {
            content,
            provider: ProviderKind::Gemini,
            model: response
                .model_version
                .unwrap_or_else(|| self.model.clone()),
            usage: response.usage_metadata.map(TokenUsage::from),
        })
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ModelProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn complete<'a>(
        &'a self,
        prompt: &'a Prompt,
    ) -> ProviderFuture<'a, Result<Completion, ProviderError>> {
        Box::pin(async move {
            prompt.validate()?;
            let request = self.build_request(prompt)?;
            let response = self.transport.post_json(request).await?;

            if !response.is_success() {
                return Err(error_from_response(ProviderKind::Gemini, &response));
            }

            let parsed: GenerateContentResponse = parse_json(ProviderKind::Gemini, &response)?;
            self.into_completion(parsed)
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
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

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

impl From<UsageMetadata> for TokenUsage {
    fn from(value: UsageMetadata) -> Self {
        Self {
            input_tokens: value.prompt_token_count,
            output_tokens: value.candidates_token_count,
            total_tokens: value.total_token_count,
        }
    }
}
