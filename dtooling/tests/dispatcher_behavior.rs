use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dcommon::BoxFuture;
use dprovider::{
    Completion, FailoverRouter, GeneratedImage, ImagePrompt, ImageProvider, ModelProvider, Prompt,
    ProviderError, ProviderFuture, ProviderKind, ProviderRegistry, RouterPolicy,
};
use dtooling::catalog::builtin_registry;
use dtooling::{
    DispatchHooks, FsImageSink, ImageSink, ToolDispatcher, ToolError, ToolErrorKind, ToolOutput,
};
use serde_json::json;

#[derive(Default)]
struct RecordingModel {
    prompts: Mutex<Vec<Prompt>>,
}

impl RecordingModel {
    fn calls(&self) -> usize {
        self.prompts.lock().expect("prompts lock").len()
    }

    fn last_prompt(&self) -> Prompt {
        self.prompts
            .lock()
            .expect("prompts lock")
            .last()
            .cloned()
            .expect("a prompt should have been routed")
    }
}

struct SharedModel(Arc<RecordingModel>);

impl ModelProvider for SharedModel {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DeepSeek
    }

    fn model(&self) -> &str {
        "deepseek-chat"
    }

    fn complete<'a>(
        &'a self,
        prompt: &'a Prompt,
    ) -> ProviderFuture<'a, Result<Completion, ProviderError>> {
        Box::pin(async move {
            self.0
                .prompts
                .lock()
                .expect("prompts lock")
                .push(prompt.clone());
            Ok(Completion {
                content: "model answer".to_string(),
                provider: ProviderKind::DeepSeek,
                model: "deepseek-chat".to_string(),
                usage: None,
            })
        })
    }
}

struct FakeImageProvider {
    prompts: Mutex<Vec<String>>,
    outcome: Result<Vec<u8>, ProviderError>,
}

impl FakeImageProvider {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            outcome: Ok(vec![0x89, b'P', b'N', b'G']),
        })
    }

    fn failing(error: ProviderError) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            outcome: Err(error),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

impl ImageProvider for FakeImageProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    fn model(&self) -> &str {
        "stabilityai/stable-diffusion-2-1"
    }

    fn generate<'a>(
        &'a self,
        prompt: &'a ImagePrompt,
    ) -> ProviderFuture<'a, Result<GeneratedImage, ProviderError>> {
        Box::pin(async move {
            self.prompts
                .lock()
                .expect("prompts lock")
                .push(prompt.text.clone());
            self.outcome.clone().map(|bytes| GeneratedImage {
                bytes,
                content_type: "image/png".to_string(),
                provider: ProviderKind::HuggingFace,
                model: "stabilityai/stable-diffusion-2-1".to_string(),
            })
        })
    }
}

struct BrokenSink;

impl ImageSink for BrokenSink {
    fn save<'a>(&'a self, _bytes: &'a [u8]) -> BoxFuture<'a, io::Result<PathBuf>> {
        Box::pin(async { Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only volume")) })
    }
}

#[derive(Default)]
struct CountingHooks {
    starts: AtomicUsize,
    failures: AtomicUsize,
    save_failures: AtomicUsize,
}

impl DispatchHooks for CountingHooks {
    fn on_dispatch_start(&self, _tool_name: &str) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_dispatch_failure(&self, _tool_name: &str, _error: &ToolError, _elapsed: Duration) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn on_image_save_failure(&self, _tool_name: &str, _error: &io::Error) {
        self.save_failures.fetch_add(1, Ordering::SeqCst);
    }
}

fn dispatcher(model: &Arc<RecordingModel>) -> ToolDispatcher {
    let mut registry = ProviderRegistry::new();
    registry.register(SharedModel(model.clone()));
    let router = FailoverRouter::new(
        Arc::new(registry),
        RouterPolicy::primary_only(ProviderKind::DeepSeek),
    );
    ToolDispatcher::new(Arc::new(builtin_registry()), Arc::new(router))
}

fn image_path(output: &ToolOutput) -> Option<PathBuf> {
    output.image.as_ref().and_then(|image| image.path.clone())
}

#[tokio::test]
async fn unknown_tool_fails_without_touching_providers() {
    let model = Arc::new(RecordingModel::default());
    let images = FakeImageProvider::succeeding();
    let dispatcher = dispatcher(&model).with_image_provider(images.clone());

    let error = dispatcher
        .dispatch("unknown_tool", &json!({}))
        .await
        .expect_err("unknown tool must fail");

    assert_eq!(error.kind, ToolErrorKind::NotFound);
    assert!(error.message.contains("unknown_tool"));
    assert_eq!(error.tool_name.as_deref(), Some("unknown_tool"));
    assert_eq!(model.calls(), 0);
    assert!(images.prompts().is_empty());
}

#[tokio::test]
async fn missing_required_argument_fails_before_provider_call() {
    let model = Arc::new(RecordingModel::default());
    let hooks = Arc::new(CountingHooks::default());
    let dispatcher = dispatcher(&model).with_hooks(hooks.clone());

    let error = dispatcher
        .dispatch("code_review", &json!({"language": "Rust"}))
        .await
        .expect_err("code is required");

    assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    assert!(error.message.contains("code"));
    assert_eq!(model.calls(), 0);
    assert_eq!(hooks.starts.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.failures.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn text_tool_routes_built_prompt_with_budget() {
    let model = Arc::new(RecordingModel::default());
    let dispatcher = dispatcher(&model);

    let output = dispatcher
        .dispatch("code_review", &json!({"code": "let x=1", "language": "JavaScript"}))
        .await
        .expect("review should succeed");

    assert_eq!(output.text, "model answer");
    assert_eq!(output.provider, Some(ProviderKind::DeepSeek));
    let prompt = model.last_prompt();
    assert!(prompt.text.contains("let x=1"));
    assert!(prompt.text.contains("JavaScript"));
    assert_eq!(prompt.token_budget, 1500);
}

#[tokio::test]
async fn null_arguments_are_treated_as_empty_object() {
    let model = Arc::new(RecordingModel::default());
    let dispatcher = dispatcher(&model);

    let error = dispatcher
        .dispatch("smart_conversation", &serde_json::Value::Null)
        .await
        .expect_err("message is required");

    assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    assert!(error.message.contains("message"));
}

#[tokio::test]
async fn non_object_arguments_are_rejected() {
    let model = Arc::new(RecordingModel::default());
    let dispatcher = dispatcher(&model);

    let error = dispatcher
        .dispatch("smart_conversation", &json!("hello"))
        .await
        .expect_err("string arguments must fail");

    assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn local_tool_answers_without_provider() {
    let model = Arc::new(RecordingModel::default());
    let dispatcher = dispatcher(&model);

    let output = dispatcher
        .dispatch("enhance_prompt", &json!({"basic_prompt": "a castle"}))
        .await
        .expect("enhance_prompt should succeed");

    assert_eq!(output.provider_label(), "local");
    assert!(output.text.contains("a castle, photorealistic"));
    let details = output.details.expect("enhance_prompt should report details");
    assert_eq!(details["original"], "a castle");
    assert_eq!(details["type"], "photo");
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn image_without_saving_returns_inline_bytes() {
    let model = Arc::new(RecordingModel::default());
    let images = FakeImageProvider::succeeding();
    let dispatcher = dispatcher(&model).with_image_provider(images.clone());

    let output = dispatcher
        .dispatch(
            "generate_image",
            &json!({"prompt": "a red fox", "style": "sketch", "save_locally": false}),
        )
        .await
        .expect("image should generate");

    let sent = images.prompts();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("a red fox"));
    assert!(sent[0].contains("pencil sketch"));

    let image = output.image.as_ref().expect("image artifact");
    assert_eq!(image.path, None);
    assert_eq!(image.bytes.as_deref(), Some(&[0x89, b'P', b'N', b'G'][..]));
    assert_eq!(image.size_bytes, 4);
    assert_eq!(output.provider, Some(ProviderKind::HuggingFace));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn image_is_saved_under_configured_directory() {
    let root = tempfile::tempdir().expect("tempdir should be created");
    let model = Arc::new(RecordingModel::default());
    let dispatcher = dispatcher(&model)
        .with_image_provider(FakeImageProvider::succeeding())
        .with_image_sink(Arc::new(FsImageSink::new(root.path().join("generated_images"))));

    let output = dispatcher
        .dispatch("generate_image", &json!({"prompt": "a lighthouse"}))
        .await
        .expect("image should generate");

    let path = image_path(&output).expect("image should be saved by default");
    assert!(path.starts_with(root.path().join("generated_images")));
    assert!(output.text.contains("Image saved to"));
    assert_eq!(output.image.as_ref().and_then(|image| image.bytes.clone()), None);
    assert!(path.exists());
}

#[tokio::test]
async fn save_failure_keeps_generation_and_reports_error() {
    let model = Arc::new(RecordingModel::default());
    let hooks = Arc::new(CountingHooks::default());
    let dispatcher = dispatcher(&model)
        .with_image_provider(FakeImageProvider::succeeding())
        .with_image_sink(Arc::new(BrokenSink))
        .with_hooks(hooks.clone());

    let output = dispatcher
        .dispatch("generate_website_banner", &json!({"business_type": "bakery"}))
        .await
        .expect("generation should still succeed");

    let image = output.image.as_ref().expect("image artifact");
    assert_eq!(image.path, None);
    assert!(image.bytes.is_some());
    assert_eq!(image.save_error.as_deref(), Some("read-only volume"));
    assert_eq!(hooks.save_failures.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.failures.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn image_tool_without_provider_is_a_provider_failure() {
    let model = Arc::new(RecordingModel::default());
    let dispatcher = dispatcher(&model);

    let error = dispatcher
        .dispatch("generate_image", &json!({"prompt": "a fox"}))
        .await
        .expect_err("no image provider configured");

    assert_eq!(error.kind, ToolErrorKind::Provider);
    assert_eq!(error.message, "image provider is not configured");
}

#[tokio::test]
async fn model_loading_surfaces_retry_after() {
    let model = Arc::new(RecordingModel::default());
    let dispatcher = dispatcher(&model).with_image_provider(FakeImageProvider::failing(
        ProviderError::model_loading("model is loading", Duration::from_secs(30)),
    ));

    let error = dispatcher
        .dispatch("generate_image", &json!({"prompt": "a fox"}))
        .await
        .expect_err("model loading should fail");

    assert_eq!(error.kind, ToolErrorKind::Provider);
    assert!(error.retryable);
    assert_eq!(error.retry_after, Some(Duration::from_secs(30)));
    assert_eq!(error.provider, Some(ProviderKind::HuggingFace));
}

#[tokio::test]
async fn routing_failure_maps_to_routing_exhausted() {
    let router = FailoverRouter::new(
        Arc::new(ProviderRegistry::new()),
        RouterPolicy::new(ProviderKind::DeepSeek, Some(ProviderKind::Gemini)),
    );
    let dispatcher = ToolDispatcher::new(Arc::new(builtin_registry()), Arc::new(router));

    let error = dispatcher
        .dispatch("smart_conversation", &json!({"message": "Hello"}))
        .await
        .expect_err("no providers configured");

    assert_eq!(error.kind, ToolErrorKind::RoutingExhausted);
    assert!(error.message.contains("no provider available"));
}

#[tokio::test]
async fn every_tool_with_required_arguments_returns_a_result() {
    let model = Arc::new(RecordingModel::default());
    let root = tempfile::tempdir().expect("tempdir should be created");
    let dispatcher = dispatcher(&model)
        .with_image_provider(FakeImageProvider::succeeding())
        .with_image_sink(Arc::new(FsImageSink::new(root.path())));

    let cases = [
        ("smart_conversation", json!({"message": "hi"})),
        ("code_review", json!({"code": "fn main() {}"})),
        ("readme_generation", json!({"project_info": "a crate"})),
        ("ui_feedback", json!({"ui_description": "a form"})),
        ("generate_image", json!({"prompt": "a tree"})),
        ("generate_website_banner", json!({"business_type": "cafe"})),
        ("enhance_prompt", json!({"basic_prompt": "a bird"})),
    ];

    for (tool, arguments) in cases {
        let output = dispatcher
            .dispatch(tool, &arguments)
            .await
            .unwrap_or_else(|error| panic!("{tool} should succeed: {error}"));
        assert_eq!(output.tool_name, tool);
    }
}
