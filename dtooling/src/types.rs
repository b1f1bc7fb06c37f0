//! Tool definitions and dispatch output types.

use std::path::PathBuf;

use dprovider::{ProviderKind, TokenUsage};
use serde_json::{Map, Value};

/// Provider label reported for tools answered without any provider.
pub const LOCAL_PROVIDER: &str = "local";

#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[derive(Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    pub prompt: String,
    pub style: String,
    pub content_type: String,
    pub size_bytes: usize,
    pub path: Option<PathBuf>,
    /// Present when the image was not written to disk.
    pub bytes: Option<Vec<u8>>,
    pub save_error: Option<String>,
}

impl ImageArtifact {
    pub fn is_saved(&self) -> bool {
        self.path.is_some()
    }
}

impl std::fmt::Debug for ImageArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageArtifact")
            .field("prompt", &self.prompt)
            .field("style", &self.style)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.size_bytes)
            .field("path", &self.path)
            .field("inline", &self.bytes.is_some())
            .field("save_error", &self.save_error)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub tool_name: String,
    pub text: String,
    pub provider: Option<ProviderKind>,
    pub usage: Option<TokenUsage>,
    pub image: Option<ImageArtifact>,
    pub details: Option<Map<String, Value>>,
}

impl ToolOutput {
    pub fn new(tool_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            text: text.into(),
            provider: None,
            usage: None,
            image: None,
            details: None,
        }
    }

    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_usage(mut self, usage: Option<TokenUsage>) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_image(mut self, image: ImageArtifact) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn provider_label(&self) -> &'static str {
        self.provider.map_or(LOCAL_PROVIDER, ProviderKind::as_str)
    }
}
