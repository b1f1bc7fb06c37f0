use dcommon::BoxFuture;

use crate::{Completion, GeneratedImage, ImagePrompt, Prompt, ProviderError, ProviderKind};

pub type ProviderFuture<'a, T> = BoxFuture<'a, T>;

/// Text-generation backend: one prompt in, one completion out.
pub trait ModelProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn model(&self) -> &str;

    fn complete<'a>(&'a self, prompt: &'a Prompt)
    -> ProviderFuture<'a, Result<Completion, ProviderError>>;
}

/// Text-to-image backend.
pub trait ImageProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn model(&self) -> &str;

    fn generate<'a>(
        &'a self,
        prompt: &'a ImagePrompt,
    ) -> ProviderFuture<'a, Result<GeneratedImage, ProviderError>>;
}
