//! DeepSeek provider over the chat-completions HTTP API.

use std::sync::Arc;

use dcommon::SecretString;
use serde::{Deserialize, Serialize};

use crate::{
    Completion, HttpAuth, HttpRequest, HttpTransport, ModelProvider, Prompt, ProviderConfig,
    ProviderError, ProviderFuture, ProviderKind, TokenUsage,
};

use super::{endpoint, error_from_response, parse_json};

pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEEPSEEK_MAX_TOKENS: u32 = 8192;

const DEEPSEEK_TEMPERATURE: f64 = 0.7;

#[derive(Clone)]
pub struct DeepSeekProvider {
    transport: Arc<dyn HttpTransport>,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl DeepSeekProvider {
    pub fn new(api_key: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            api_key: SecretString::new(api_key),
            base_url: DEEPSEEK_BASE_URL.to_string(),
            model: DEEPSEEK_DEFAULT_MODEL.to_string(),
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
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt.text,
            }],
            max_tokens: prompt.clamped_budget(DEEPSEEK_MAX_TOKENS),
            temperature: DEEPSEEK_TEMPERATURE,
        };
        let body = serde_json::to_value(body)
            .map_err(|err| ProviderError::invalid_request(err.to_string()))?;

        Ok(
            HttpRequest::post(endpoint(&self.base_url, "chat/completions"), body)
                .with_auth(HttpAuth::Bearer(self.api_key.clone())),
        )
    }

    fn into_completion(
        &self,
        response: ChatCompletionResponse,
    ) -> Result<Completion, ProviderError> {
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            ProviderError::malformed_response("deepseek response did not include choices")
        })?;

        let content = choice.message.content.unwrap_or_default();
        if content.trim().is_empty() {
            return Err(ProviderError::malformed_response(
                "deepseek response did not include message content",
            ));
        }

        Ok(Completion {
            content,
            provider: ProviderKind::DeepSeek,
            model: response.model.unwrap_or_else(|| self.model.clone()),
            usage: response.usage.map(TokenUsage::from),
        })
    }
}

impl std::fmt::Debug for DeepSeekProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepSeekProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ModelProvider for DeepSeekProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DeepSeek
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
                return Err(error_from_response(ProviderKind::DeepSeek, &response));
            }

            let parsed: ChatCompletionResponse = parse_json(ProviderKind::DeepSeek, &response)?;
            self.into_completion(parsed)
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl From<ChatUsage> for TokenUsage {
    fn from(value: ChatUsage) -> Self {
        Self {
            input_tokens: value.prompt_tokens,
            output_tokens: value.completion_tokens,
            total_tokens: value.total_tokens,
        }
    }
}
