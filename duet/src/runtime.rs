//! Wires configured providers, router, tools, and hooks into one dispatcher.

use std::path::PathBuf;
use std::sync::Arc;

use dobserve::StandardObservabilityHooks;
use dprovider::{
    DeepSeekProvider, FailoverRouter, GeminiProvider, HttpTransport, HuggingFaceProvider,
    ImageProvider, ProviderKind, ProviderRegistry, ReqwestTransport, RouterPolicy, TunnelConfig,
};
use dtooling::{FsImageSink, ToolDispatcher, catalog::builtin_registry};

use crate::{ConfigError, ServerConfig, StartupError};

/// What the service reports about itself on `/` and `/health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub primary: ProviderKind,
    /// `None` when the other text provider has no key.
    pub secondary: Option<ProviderKind>,
    pub tunnel: Option<TunnelConfig>,
    pub image_provider: Option<ProviderKind>,
    pub image_directory: PathBuf,
}

impl ServiceInfo {
    pub fn tunnel_label(&self) -> String {
        self.tunnel
            .as_ref()
            .map_or_else(|| "disabled".to_string(), TunnelConfig::proxy_url)
    }
}

#[derive(Debug, Clone)]
pub struct ServiceRuntime {
    pub dispatcher: Arc<ToolDispatcher>,
    pub info: Arc<ServiceInfo>,
}

impl ServiceRuntime {
    /// True when at least one text provider can answer.
    pub fn has_text_provider(&self) -> bool {
        !self.dispatcher.router().registry().is_empty()
    }
}

pub fn build_runtime(config: &ServerConfig) -> Result<ServiceRuntime, StartupError> {
    let transport = ReqwestTransport::from_config(&config.transport_config())?;
    Ok(build_runtime_with_transport(config, Arc::new(transport))?)
}

/// Same wiring as [`build_runtime`] over a caller-supplied transport.
pub fn build_runtime_with_transport(
    config: &ServerConfig,
    transport: Arc<dyn HttpTransport>,
) -> Result<ServiceRuntime, ConfigError> {
    let primary = config.primary_kind()?;
    let secondary = config.secondary_kind()?;

    let mut registry = ProviderRegistry::new();
    for kind in [primary, secondary] {
        let Some(provider_config) = config.provider_config(kind) else {
            continue;
        };
        match kind {
            ProviderKind::DeepSeek => registry.register(DeepSeekProvider::from_config(
                &provider_config,
                Arc::clone(&transport),
            )),
            ProviderKind::Gemini => registry.register(GeminiProvider::from_config(
                &provider_config,
                Arc::clone(&transport),
            )),
            ProviderKind::HuggingFace => {}
        }
    }

    let hooks = Arc::new(StandardObservabilityHooks::default());
    let policy = RouterPolicy::new(primary, Some(secondary));
    let router = FailoverRouter::new(Arc::new(registry), policy).with_hooks(hooks.clone());
    let secondary = router
        .registry()
        .contains(secondary)
        .then_some(secondary);

    let image_directory = PathBuf::from(&config.image_save_path);
    let mut dispatcher = ToolDispatcher::new(Arc::new(builtin_registry()), Arc::new(router))
        .with_image_sink(Arc::new(FsImageSink::new(image_directory.clone())))
        .with_hooks(hooks);

    let image_provider = config
        .provider_config(ProviderKind::HuggingFace)
        .map(|provider_config| {
            Arc::new(HuggingFaceProvider::from_config(&provider_config, transport))
                as Arc<dyn ImageProvider>
        });
    let image_kind = image_provider.as_ref().map(|provider| provider.kind());
    if let Some(provider) = image_provider {
        dispatcher = dispatcher.with_image_provider(provider);
    }

    Ok(ServiceRuntime {
        dispatcher: Arc::new(dispatcher),
        info: Arc::new(ServiceInfo {
            primary,
            secondary,
            tunnel: config.tunnel(),
            image_provider: image_kind,
            image_directory,
        }),
    })
}
