//! Tool dispatch: lookup, validation, planning, and provider invocation.

use std::sync::Arc;
use std::time::Instant;

use dprovider::{FailoverRouter, GeneratedImage, ImagePrompt, ImageProvider};
use serde_json::Value;

use crate::{
    DispatchHooks, ImageArtifact, ImagePlan, ImageSink, NoopDispatchHooks, ToolError, ToolOutput,
    ToolPlan, ToolRegistry,
};

#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    router: Arc<FailoverRouter>,
    image_provider: Option<Arc<dyn ImageProvider>>,
    image_sink: Option<Arc<dyn ImageSink>>,
    hooks: Arc<dyn DispatchHooks>,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>, router: Arc<FailoverRouter>) -> Self {
        Self {
            registry,
            router,
            image_provider: None,
            image_sink: None,
            hooks: Arc::new(NoopDispatchHooks),
        }
    }

    pub fn with_image_provider(mut self, provider: Arc<dyn ImageProvider>) -> Self {
        self.image_provider = Some(provider);
        self
    }

    pub fn with_image_sink(mut self, sink: Arc<dyn ImageSink>) -> Self {
        self.image_sink = Some(sink);
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn DispatchHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn router(&self) -> &FailoverRouter {
        &self.router
    }

    pub fn image_provider(&self) -> Option<&Arc<dyn ImageProvider>> {
        self.image_provider.as_ref()
    }

    /// Runs one tool call. `arguments` of `null` is treated as `{}`.
    pub async fn dispatch(
        &self,
        tool_name: &str,
        arguments: &Value,
    ) -> Result<ToolOutput, ToolError> {
        self.hooks.on_dispatch_start(tool_name);
        let started = Instant::now();

        match self.run(tool_name, arguments).await {
            Ok(output) => {
                self.hooks
                    .on_dispatch_success(tool_name, &output, started.elapsed());
                Ok(output)
            }
            Err(error) => {
                let error = error.with_tool_name(tool_name);
                self.hooks
                    .on_dispatch_failure(tool_name, &error, started.elapsed());
                Err(error)
            }
        }
    }

    async fn run(&self, tool_name: &str, arguments: &Value) -> Result<ToolOutput, ToolError> {
        let tool = self
            .registry
            .get(tool_name)
            .ok_or_else(|| ToolError::not_found(format!("unknown tool: {tool_name}")))?;

        let args = tool.schema().validate(arguments)?;

        match tool.plan(&args)? {
            ToolPlan::Text(prompt) => {
                let completion = self.router.route(&prompt).await.into_result()?;
                Ok(ToolOutput::new(tool_name, completion.content)
                    .with_provider(completion.provider)
                    .with_usage(completion.usage))
            }
            ToolPlan::Image(plan) => self.generate_image(tool_name, plan).await,
            ToolPlan::Local(text) => Ok(ToolOutput::new(tool_name, text)),
            ToolPlan::Report { text, details } => {
                Ok(ToolOutput::new(tool_name, text).with_details(details))
            }
        }
    }

    async fn generate_image(
        &self,
        tool_name: &str,
        plan: ImagePlan,
    ) -> Result<ToolOutput, ToolError> {
        let provider = self
            .image_provider
            .as_ref()
            .ok_or_else(|| ToolError::provider("image provider is not configured"))?;

        let image = provider
            .generate(&ImagePrompt::new(plan.prompt.clone()))
            .await
            .map_err(|error| ToolError::from_provider(provider.kind(), &error))?;
        let producer = image.provider;

        let artifact = if plan.save {
            self.persist(tool_name, &plan, image).await
        } else {
            inline_artifact(&plan, image, None)
        };

        let text = match (&artifact.path, &artifact.save_error) {
            (Some(path), _) => format!("Image saved to {}", path.display()),
            (None, Some(error)) => format!("Image generated successfully (saving failed: {error})"),
            (None, None) => "Image generated successfully".to_string(),
        };

        Ok(ToolOutput::new(tool_name, text)
            .with_provider(producer)
            .with_image(artifact))
    }

    async fn persist(
        &self,
        tool_name: &str,
        plan: &ImagePlan,
        image: GeneratedImage,
    ) -> ImageArtifact {
        let Some(sink) = &self.image_sink else {
            return inline_artifact(
                plan,
                image,
                Some("image directory is not configured".to_string()),
            );
        };

        match sink.save(&image.bytes).await {
            Ok(path) => {
                self.hooks
                    .on_image_saved(tool_name, &path, image.bytes.len());
                ImageArtifact {
                    prompt: plan.prompt.clone(),
                    style: plan.style.clone(),
                    content_type: image.content_type,
                    size_bytes: image.bytes.len(),
                    path: Some(path),
                    bytes: None,
                    save_error: None,
                }
            }
            Err(error) => {
                self.hooks.on_image_save_failure(tool_name, &error);
                inline_artifact(plan, image, Some(error.to_string()))
            }
        }
    }
}

fn inline_artifact(
    plan: &ImagePlan,
    image: GeneratedImage,
    save_error: Option<String>,
) -> ImageArtifact {
    ImageArtifact {
        prompt: plan.prompt.clone(),
        style: plan.style.clone(),
        content_type: image.content_type,
        size_bytes: image.bytes.len(),
        path: None,
        bytes: Some(image.bytes),
        save_error,
    }
}

impl std::fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDispatcher")
            .field("registry", &self.registry)
            .field("router", &self.router)
            .field("image_provider", &self.image_provider.as_ref().map(|p| p.kind()))
            .field("image_sink", &self.image_sink.is_some())
            .finish_non_exhaustive()
    }
}
