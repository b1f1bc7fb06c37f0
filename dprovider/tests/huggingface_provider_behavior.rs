#![cfg(feature = "provider-huggingface")]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dprovider::{
    HttpAuth, HttpRequest, HttpResponse, HttpTransport, HuggingFaceProvider, ImagePrompt,
    ImageProvider, ProviderError, ProviderErrorKind, ProviderFuture, ProviderKind,
};
use serde_json::json;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug)]
struct FakeTransport {
    requests: Mutex<Vec<HttpRequest>>,
    response: HttpResponse,
}

impl FakeTransport {
    fn replying(response: HttpResponse) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            response,
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl HttpTransport for FakeTransport {
    fn post_json<'a>(
        &'a self,
        request: HttpRequest,
    ) -> ProviderFuture<'a, Result<HttpResponse, ProviderError>> {
        Box::pin(async move {
            self.requests.lock().expect("requests lock").push(request);
            Ok(self.response.clone())
        })
    }
}

#[tokio::test]
async fn generate_returns_image_bytes() {
    let transport = FakeTransport::replying(
        HttpResponse::new(200, PNG_MAGIC.to_vec()).with_content_type("image/png"),
    );
    let provider = HuggingFaceProvider::new("hf_live", transport.clone());

    let image = provider
        .generate(&ImagePrompt::new("a red fox, pencil sketch"))
        .await
        .expect("generation should succeed");

    assert_eq!(image.bytes, PNG_MAGIC.to_vec());
    assert_eq!(image.content_type, "image/png");
    assert_eq!(image.provider, ProviderKind::HuggingFace);
    assert_eq!(image.model, "stabilityai/stable-diffusion-2-1");

    let requests = transport.requests();
    assert_eq!(
        requests[0].url,
        "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-2-1"
    );
    assert_eq!(requests[0].body, json!({"inputs": "a red fox, pencil sketch"}));
    assert!(matches!(requests[0].auth, HttpAuth::Bearer(ref key) if key.expose() == "hf_live"));
}

#[tokio::test]
async fn generate_reports_model_loading_with_retry_after() {
    let transport = FakeTransport::replying(HttpResponse::json(
        503,
        &json!({"error": "Model stabilityai/stable-diffusion-2-1 is currently loading", "estimated_time": 20.0}),
    ));
    let provider = HuggingFaceProvider::new("hf", transport);

    let error = provider
        .generate(&ImagePrompt::new("a lighthouse"))
        .await
        .expect_err("503 should fail");

    assert_eq!(error.kind, ProviderErrorKind::ModelLoading);
    assert!(error.retryable);
    assert_eq!(error.retry_after, Some(Duration::from_secs(20)));
}

#[tokio::test]
async fn generate_treats_json_success_body_as_malformed() {
    let transport = FakeTransport::replying(HttpResponse::json(
        200,
        &json!({"error": "unexpected input"}),
    ));
    let provider = HuggingFaceProvider::new("hf", transport);

    let error = provider
        .generate(&ImagePrompt::new("a lighthouse"))
        .await
        .expect_err("json body should fail");

    assert_eq!(error.kind, ProviderErrorKind::MalformedResponse);
    assert_eq!(error.message, "unexpected input");
}

#[tokio::test]
async fn generate_maps_authentication_failure() {
    let transport = FakeTransport::replying(HttpResponse::json(
        401,
        &json!({"error": "Invalid credentials in Authorization header"}),
    ));
    let provider = HuggingFaceProvider::new("hf_bad", transport);

    let error = provider
        .generate(&ImagePrompt::new("a lighthouse"))
        .await
        .expect_err("401 should fail");

    assert_eq!(error.kind, ProviderErrorKind::Authentication);
    assert_eq!(error.message, "Invalid credentials in Authorization header");
}
