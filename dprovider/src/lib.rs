//! Provider adapters, transport capability, and failover routing.
//!
//! Adapters speak one upstream API each and normalize replies into
//! [`Completion`], [`GeneratedImage`], or [`ProviderError`]. The
//! [`FailoverRouter`] walks a [`RouterPolicy`] over a [`ProviderRegistry`].
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use dprovider::{FailoverRouter, ProviderKind, ProviderRegistry, RouterPolicy};
//!
//! let router = FailoverRouter::new(
//!     Arc::new(ProviderRegistry::new()),
//!     RouterPolicy::new(ProviderKind::DeepSeek, Some(ProviderKind::Gemini)),
//! );
//! assert_eq!(router.policy().secondary, Some(ProviderKind::Gemini));
//! ```

pub mod adapters;
pub mod error;
pub mod failover;
pub mod model;
pub mod prelude;
pub mod provider;
pub mod registry;
pub mod transport;

pub use error::{ProviderError, ProviderErrorKind};
pub use failover::{FailoverRouter, NoopRouterHooks, RouteRole, RouterHooks, RouterPolicy};
pub use model::{
    CallFailure, CallResult, Completion, FailureKind, GeneratedImage, ImagePrompt, Prompt,
    ProviderConfig, ProviderKind, TokenUsage,
};
pub use provider::{ImageProvider, ModelProvider, ProviderFuture};
pub use registry::ProviderRegistry;
pub use transport::{
    DEFAULT_REQUEST_TIMEOUT, HttpAuth, HttpRequest, HttpResponse, HttpTransport,
    TransportConfig, TunnelConfig,
};

#[cfg(feature = "transport-reqwest")]
pub use transport::ReqwestTransport;

#[cfg(feature = "provider-deepseek")]
pub use adapters::deepseek::DeepSeekProvider;
#[cfg(feature = "provider-gemini")]
pub use adapters::gemini::GeminiProvider;
#[cfg(feature = "provider-huggingface")]
pub use adapters::huggingface::HuggingFaceProvider;
