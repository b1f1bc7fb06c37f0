//! Hugging Face inference API provider for text-to-image models.
//!
//! A `503` from the inference API means the model is still loading; it is
//! reported as [`ProviderErrorKind::ModelLoading`](crate::ProviderErrorKind)
//! with a retry-after hint instead of being retried here.

use std::sync::Arc;
use std::time::Duration;

use dcommon::SecretString;
use serde::{Deserialize, Serialize};

use crate::{
    GeneratedImage, HttpAuth, HttpRequest, HttpResponse, HttpTransport, ImagePrompt,
    ImageProvider, ProviderConfig, ProviderError, ProviderFuture, ProviderKind,
};

use super::{endpoint, error_from_response, extract_error_message};

pub const HUGGINGFACE_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const HUGGINGFACE_DEFAULT_MODEL: &str = "stabilityai/stable-diffusion-2-1";
pub const DEFAULT_MODEL_LOADING_RETRY: Duration = Duration::from_secs(30);

const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/png";

#[derive(Clone)]
pub struct HuggingFaceProvider {
    transport: Arc<dyn HttpTransport>,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl HuggingFaceProvider {
    pub fn new(api_key: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            api_key: SecretString::new(api_key),
            base_url: HUGGINGFACE_BASE_URL.to_string(),
            model: HUGGINGFACE_DEFAULT_MODEL.to_string(),
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

    pub(crate) fn build_request(&self, prompt: &ImagePrompt) -> Result<HttpRequest, ProviderError> {
        let body = serde_json::to_value(InferenceRequest {
            inputs: &prompt.text,
        })
        .map_err(|err| ProviderError::invalid_request(err.to_string()))?;
        let path = format!("models/{}", self.model);

        Ok(HttpRequest::post(endpoint(&self.base_url, &path), body)
            .with_auth(HttpAuth::Bearer(self.api_key.clone())))
    }

    fn into_image(&self, response: HttpResponse) -> Result<GeneratedImage, ProviderError> {
        if response.is_json() {
            let message = extract_error_message(&response.body)
                .unwrap_or_else(|| "huggingface returned JSON instead of an image".to_string());
            return Err(ProviderError::malformed_response(message));
        }

        if response.body.is_empty() {
            return Err(ProviderError::malformed_response(
                "huggingface returned an empty image body",
            ));
        }

        let content_type = response
            .content_type
            .unwrap_or_else(|| DEFAULT_IMAGE_CONTENT_TYPE.to_string());

        Ok(GeneratedImage {
            bytes: response.body,
            content_type,
            provider: ProviderKind::HuggingFace,
            model: self.model.clone(),
        })
    }
}

fn model_loading_error(response: &HttpResponse) -> ProviderError {
    let loading = serde_json::from_slice::<LoadingBody>(&response.body).ok();
    let retry_after = loading
        .as_ref()
        .and_then(|body| body.estimated_time)
        .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
        .map(|seconds| Duration::from_secs(seconds.ceil() as u64))
        .unwrap_or(DEFAULT_MODEL_LOADING_RETRY);
    let message = loading
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| "model is loading, retry later".to_string());

    ProviderError::model_loading(message, retry_after)
}

impl std::fmt::Debug for HuggingFaceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ImageProvider for HuggingFaceProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn generate<'a>(
        &'a self,
        prompt: &'a ImagePrompt,
    ) -> ProviderFuture<'a, Result<GeneratedImage, ProviderError>> {
        Box::pin(async move {
            prompt.validate()?;
            let request = self.build_request(prompt)?;
            let response = self.transport.post_json(request).await?;

            if response.status == 503 {
                return Err(model_loading_error(&response));
            }

            if !response.is_success() {
                return Err(error_from_response(ProviderKind::HuggingFace, &response));
            }

            self.into_image(response)
        })
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoadingBody {
    error: Option<String>,
    estimated_time: Option<f64>,
}
