//! Common `dprovider` imports for downstream crates.

pub use crate::{
    CallFailure, CallResult, Completion, FailoverRouter, FailureKind, GeneratedImage,
    ImagePrompt, ImageProvider, ModelProvider, NoopRouterHooks, Prompt, ProviderConfig,
    ProviderError, ProviderErrorKind, ProviderKind, ProviderRegistry, RouteRole, RouterHooks,
    RouterPolicy, TokenUsage,
};
pub use dcommon::{BoxFuture, SecretString};
