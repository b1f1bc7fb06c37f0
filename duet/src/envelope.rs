//! JSON bodies returned by the HTTP routes.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use dtooling::{ToolDefinition, ToolError, ToolOutput};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::ServiceInfo;

pub const SERVICE_TITLE: &str = "duet: DeepSeek + Gemini tool service";

#[derive(Debug, Clone, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl From<ToolDefinition> for ToolDescriptor {
    fn from(definition: ToolDefinition) -> Self {
        Self {
            name: definition.name,
            description: definition.description,
            input_schema: definition.input_schema,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolList {
    pub tools: Vec<ToolDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceIndex {
    pub title: &'static str,
    pub status: &'static str,
    pub primary_provider: &'static str,
    pub secondary_provider: Option<&'static str>,
    pub tunnel: String,
    pub image_provider: Option<&'static str>,
    pub tools: Vec<ToolSummary>,
}

impl ServiceIndex {
    pub fn new(info: &ServiceInfo, definitions: Vec<ToolDefinition>) -> Self {
        Self {
            title: SERVICE_TITLE,
            status: "running",
            primary_provider: info.primary.as_str(),
            secondary_provider: info.secondary.map(|kind| kind.as_str()),
            tunnel: info.tunnel_label(),
            image_provider: info.image_provider.map(|kind| kind.as_str()),
            tools: definitions
                .into_iter()
                .map(|definition| ToolSummary {
                    name: definition.name,
                    description: definition.description,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum HealthReport {
    Healthy {
        status: &'static str,
        primary_provider: &'static str,
        tunnel: String,
        provider_used: &'static str,
    },
    Unhealthy {
        status: &'static str,
        primary_provider: &'static str,
        tunnel: String,
        error: String,
    },
}

impl HealthReport {
    pub fn healthy(info: &ServiceInfo, provider_used: &'static str) -> Self {
        Self::Healthy {
            status: "healthy",
            primary_provider: info.primary.as_str(),
            tunnel: info.tunnel_label(),
            provider_used,
        }
    }

    pub fn unhealthy(info: &ServiceInfo, error: impl Into<String>) -> Self {
        Self::Unhealthy {
            status: "unhealthy",
            primary_provider: info.primary.as_str(),
            tunnel: info.tunnel_label(),
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Text {
        text: String,
    },
    Image {
        /// Base64, standard alphabet with padding.
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolSuccess {
    pub content: Vec<ContentItem>,
    #[serde(rename = "isError")]
    pub is_error: bool,
    pub provider: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// The prompt sent to the image model, style suffix included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl From<ToolOutput> for ToolSuccess {
    fn from(output: ToolOutput) -> Self {
        let provider = output.provider_label();
        let mut success = Self {
            content: vec![ContentItem::Text { text: output.text }],
            is_error: false,
            provider,
            image_path: None,
            prompt: None,
            style: None,
            size_bytes: None,
            save_error: None,
            details: output.details,
        };

        if let Some(image) = output.image {
            success.image_path = image.path.map(|path| path.display().to_string());
            success.prompt = Some(image.prompt);
            success.style = Some(image.style);
            success.size_bytes = Some(image.size_bytes);
            success.save_error = image.save_error;
            if let Some(bytes) = image.bytes {
                success.content.push(ContentItem::Image {
                    data: STANDARD.encode(bytes),
                    mime_type: image.content_type,
                });
            }
        }

        success
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolFailure {
    pub success: bool,
    pub error: String,
    #[serde(rename = "isError")]
    pub is_error: bool,
    /// Whole seconds, rounded up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl ToolFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            is_error: true,
            retry_after: None,
        }
    }

    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        let rounded_up = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
        self.retry_after = Some(rounded_up);
        self
    }
}

impl From<ToolError> for ToolFailure {
    fn from(error: ToolError) -> Self {
        let failure = Self::new(error.message);
        match error.retry_after {
            Some(retry_after) => failure.with_retry_after(retry_after),
            None => failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use dprovider::ProviderKind;
    use dtooling::ImageArtifact;
    use serde_json::json;

    use super::*;

    fn artifact(path: Option<&str>, bytes: Option<Vec<u8>>) -> ImageArtifact {
        ImageArtifact {
            prompt: "a red fox".to_string(),
            style: "sketch".to_string(),
            content_type: "image/jpeg".to_string(),
            size_bytes: 3,
            path: path.map(PathBuf::from),
            bytes,
            save_error: None,
        }
    }

    #[test]
    fn text_success_reports_provider() {
        let output =
            ToolOutput::new("code_review", "looks fine").with_provider(ProviderKind::Gemini);

        let body = serde_json::to_value(ToolSuccess::from(output)).expect("serializes");

        assert_eq!(
            body,
            json!({
                "content": [{"type": "text", "text": "looks fine"}],
                "isError": false,
                "provider": "gemini",
            })
        );
    }

    #[test]
    fn saved_image_adds_path_without_inline_data() {
        let output = ToolOutput::new("generate_image", "Image saved to /tmp/a.png")
            .with_provider(ProviderKind::HuggingFace)
            .with_image(artifact(Some("/tmp/a.png"), None));

        let body = serde_json::to_value(ToolSuccess::from(output)).expect("serializes");

        assert_eq!(body["image_path"], "/tmp/a.png");
        assert_eq!(body["content"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["prompt"], "a red fox");
        assert_eq!(body["style"], "sketch");
        assert_eq!(body["size_bytes"], 3);
        assert!(body.get("save_error").is_none());
    }

    #[test]
    fn failed_save_reports_error_alongside_inline_data() {
        let mut image = artifact(None, Some(vec![0xff, 0xd8, 0xff]));
        image.save_error = Some("permission denied".to_string());
        let output = ToolOutput::new("generate_image", "Image generated successfully")
            .with_provider(ProviderKind::HuggingFace)
            .with_image(image);

        let body = serde_json::to_value(ToolSuccess::from(output)).expect("serializes");

        assert_eq!(body["save_error"], "permission denied");
        assert_eq!(body["content"][1]["type"], "image");
    }

    #[test]
    fn inline_image_is_base64_encoded() {
        let output = ToolOutput::new("generate_image", "Image generated successfully")
            .with_provider(ProviderKind::HuggingFace)
            .with_image(artifact(None, Some(vec![0xff, 0xd8, 0xff])));

        let body = serde_json::to_value(ToolSuccess::from(output)).expect("serializes");

        assert!(body.get("image_path").is_none());
        assert_eq!(
            body["content"][1],
            json!({"type": "image", "data": "/9j/", "mimeType": "image/jpeg"})
        );
    }

    #[test]
    fn failure_rounds_retry_after_up() {
        let failure =
            ToolFailure::new("model loading").with_retry_after(Duration::from_millis(20_500));

        let body = serde_json::to_value(failure).expect("serializes");

        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "model loading",
                "isError": true,
                "retry_after": 21,
            })
        );
    }

    #[test]
    fn failure_without_retry_after_omits_field() {
        let body = serde_json::to_value(ToolFailure::from(ToolError::not_found(
            "unknown tool: nope",
        )))
        .expect("serializes");

        assert!(body.get("retry_after").is_none());
        assert_eq!(body["error"], "unknown tool: nope");
    }
}
