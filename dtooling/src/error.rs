//! Tool dispatch errors and classifications.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use dprovider::{CallFailure, FailureKind, ProviderError, ProviderKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    NotFound,
    InvalidArguments,
    Provider,
    RoutingExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub retryable: bool,
    pub retry_after: Option<Duration>,
    pub provider: Option<ProviderKind>,
    pub tool_name: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            retry_after: None,
            provider: None,
            tool_name: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message, false)
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message, false)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Provider, message, false)
    }

    pub fn from_provider(provider: ProviderKind, error: &ProviderError) -> Self {
        Self {
            kind: ToolErrorKind::Provider,
            message: error.message.clone(),
            retryable: error.retryable,
            retry_after: error.retry_after,
            provider: Some(provider),
            tool_name: None,
        }
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::InvalidArguments | ToolErrorKind::NotFound
        )
    }
}

impl From<CallFailure> for ToolError {
    fn from(failure: CallFailure) -> Self {
        let kind = match failure.kind {
            FailureKind::Provider(_) => ToolErrorKind::Provider,
            FailureKind::RoutingExhausted => ToolErrorKind::RoutingExhausted,
        };

        Self {
            kind,
            message: failure.message,
            retryable: failure.retryable,
            retry_after: failure.retry_after,
            provider: failure.provider,
            tool_name: None,
        }
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.tool_name, self.provider) {
            (Some(tool_name), Some(provider)) => write!(
                f,
                "{:?} [tool={}, provider={}]: {}",
                self.kind, tool_name, provider, self.message
            ),
            (Some(tool_name), None) => {
                write!(f, "{:?} [tool={}]: {}", self.kind, tool_name, self.message)
            }
            (None, Some(provider)) => {
                write!(f, "{:?} [provider={}]: {}", self.kind, provider, self.message)
            }
            (None, None) => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ToolError {}

#[cfg(test)]
mod tests {
    use dprovider::ProviderErrorKind;

    use super::*;

    #[test]
    fn helper_methods_report_retryable_and_user_error() {
        let invalid = ToolError::invalid_arguments("bad args");
        assert!(!invalid.is_retryable());
        assert!(invalid.is_user_error());

        let loading = ToolError::from_provider(
            ProviderKind::HuggingFace,
            &ProviderError::model_loading("loading", Duration::from_secs(30)),
        );
        assert!(loading.is_retryable());
        assert!(!loading.is_user_error());
        assert_eq!(loading.retry_after, Some(Duration::from_secs(30)));
    }

    #[test]
    fn call_failure_conversion_keeps_classification() {
        let failure = CallFailure::from_provider(
            ProviderKind::Gemini,
            &ProviderError::new(ProviderErrorKind::RateLimited, "quota", true),
        );
        let error = ToolError::from(failure);
        assert_eq!(error.kind, ToolErrorKind::Provider);
        assert_eq!(error.provider, Some(ProviderKind::Gemini));
        assert!(error.retryable);

        let exhausted = ToolError::from(CallFailure::exhausted("nothing configured"));
        assert_eq!(exhausted.kind, ToolErrorKind::RoutingExhausted);
    }

    #[test]
    fn context_fields_are_included_in_display() {
        let error = ToolError::not_found("unknown tool: summarize").with_tool_name("summarize");

        let rendered = error.to_string();
        assert!(rendered.contains("tool=summarize"));
        assert!(rendered.contains("unknown tool"));
    }
}
