//! Provider-agnostic prompt, completion, and call outcome types.
//!
//! ```rust
//! use dprovider::{Prompt, ProviderErrorKind, ProviderKind};
//!
//! let prompt = Prompt::new("Review this diff", 1500);
//! assert!(prompt.validate().is_ok());
//! assert_eq!(prompt.clamped_budget(1000), 1000);
//!
//! let err = Prompt::new("   ", 10).validate().expect_err("blank prompt must fail");
//! assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
//!
//! assert_eq!("google".parse::<ProviderKind>(), Ok(ProviderKind::Gemini));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use dcommon::SecretString;

use crate::{ProviderError, ProviderErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProviderKind {
    DeepSeek,
    Gemini,
    HuggingFace,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek",
            Self::Gemini => "gemini",
            Self::HuggingFace => "huggingface",
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "deepseek" => Ok(Self::DeepSeek),
            "gemini" | "google" | "google-gemini" => Ok(Self::Gemini),
            "huggingface" | "hugging-face" | "hf" => Ok(Self::HuggingFace),
            other => Err(ProviderError::invalid_request(format!(
                "unknown provider '{other}'"
            ))),
        }
    }
}

/// Backend identity and credentials, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: SecretString,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            api_key: SecretString::new(api_key),
            base_url: None,
            model: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub token_budget: u32,
}

impl Prompt {
    pub fn new(text: impl Into<String>, token_budget: u32) -> Self {
        Self {
            text: text.into(),
            token_budget,
        }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.text.trim().is_empty() {
            return Err(ProviderError::invalid_request("prompt text must not be empty"));
        }

        if self.token_budget == 0 {
            return Err(ProviderError::invalid_request(
                "token budget must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Budget limited to an adapter's ceiling; oversize hints are not errors.
    pub fn clamped_budget(&self, ceiling: u32) -> u32 {
        self.token_budget.min(ceiling)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePrompt {
    pub text: String,
}

impl ImagePrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.text.trim().is_empty() {
            return Err(ProviderError::invalid_request("image prompt must not be empty"));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub provider: ProviderKind,
    pub model: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub provider: ProviderKind,
    pub model: String,
}

impl std::fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("bytes", &self.bytes.len())
            .field("content_type", &self.content_type)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Provider(ProviderErrorKind),
    RoutingExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFailure {
    pub kind: FailureKind,
    pub message: String,
    pub provider: Option<ProviderKind>,
    pub retryable: bool,
    pub retry_after: Option<Duration>,
}

impl CallFailure {
    pub fn from_provider(provider: ProviderKind, error: &ProviderError) -> Self {
        Self {
            kind: FailureKind::Provider(error.kind),
            message: error.message.clone(),
            provider: Some(provider),
            retryable: error.retryable,
            retry_after: error.retry_after,
        }
    }

    pub fn exhausted(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::RoutingExhausted,
            message: message.into(),
            provider: None,
            retryable: false,
            retry_after: None,
        }
    }
}

impl Display for CallFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.provider {
            Some(provider) => write!(f, "{:?} [provider={provider}]: {}", self.kind, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for CallFailure {}

/// Outcome of one routed call: exactly one variant is ever populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallResult {
    Success(Completion),
    Failure(CallFailure),
}

impl CallResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn provider(&self) -> Option<ProviderKind> {
        match self {
            Self::Success(completion) => Some(completion.provider),
            Self::Failure(failure) => failure.provider,
        }
    }

    pub fn into_result(self) -> Result<Completion, CallFailure> {
        match self {
            Self::Success(completion) => Ok(completion),
            Self::Failure(failure) => Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_display_is_stable() {
        assert_eq!(ProviderKind::DeepSeek.to_string(), "deepseek");
        assert_eq!(ProviderKind::Gemini.to_string(), "gemini");
        assert_eq!(ProviderKind::HuggingFace.to_string(), "huggingface");
    }

    #[test]
    fn provider_kind_parses_aliases() {
        assert_eq!("DeepSeek".parse::<ProviderKind>(), Ok(ProviderKind::DeepSeek));
        assert_eq!(" google ".parse::<ProviderKind>(), Ok(ProviderKind::Gemini));
        assert_eq!("hf".parse::<ProviderKind>(), Ok(ProviderKind::HuggingFace));

        let err = "openai".parse::<ProviderKind>().expect_err("unknown provider");
        assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
        assert!(err.message.contains("openai"));
    }

    #[test]
    fn prompt_validate_enforces_contract() {
        let zero = Prompt::new("hi", 0).validate().expect_err("zero budget");
        assert_eq!(zero.kind, ProviderErrorKind::InvalidRequest);

        assert_eq!(Prompt::new("hi", 50_000).clamped_budget(8192), 8192);
        assert_eq!(Prompt::new("hi", 50).clamped_budget(8192), 50);
    }

    #[test]
    fn call_failure_carries_provider_error_fields() {
        let error = ProviderError::model_loading("loading", Duration::from_secs(20));
        let failure = CallFailure::from_provider(ProviderKind::HuggingFace, &error);

        assert_eq!(
            failure.kind,
            FailureKind::Provider(ProviderErrorKind::ModelLoading)
        );
        assert!(failure.retryable);
        assert_eq!(failure.retry_after, Some(Duration::from_secs(20)));
        assert!(failure.to_string().contains("huggingface"));
    }

    #[test]
    fn call_result_into_result_splits_variants() {
        let success = CallResult::Success(Completion {
            content: "ok".to_string(),
            provider: ProviderKind::Gemini,
            model: "gemini-1.5-flash".to_string(),
            usage: None,
        });
        assert_eq!(success.provider(), Some(ProviderKind::Gemini));
        assert!(success.clone().into_result().is_ok());

        let failure = CallResult::Failure(CallFailure::exhausted("none"));
        assert!(!failure.is_success());
        assert_eq!(failure.provider(), None);
        assert!(failure.into_result().is_err());
    }
}
