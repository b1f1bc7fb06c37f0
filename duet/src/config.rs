//! Service configuration read from the process environment.
//!
//! Keys are matched case-insensitively, so `DEEPSEEK_API_KEY` lands in
//! [`ServerConfig::deepseek_api_key`].
//!
//! ```rust
//! use duet::ServerConfig;
//! use dprovider::ProviderKind;
//!
//! let config = ServerConfig::from_vars([
//!     ("API_PROVIDER", "google"),
//!     ("GOOGLE_API_KEY", "g-key"),
//!     ("PORT", "8080"),
//! ])
//! .expect("config should load");
//!
//! assert_eq!(config.primary_kind().expect("valid provider"), ProviderKind::Gemini);
//! assert_eq!(config.bind_address(), "localhost:8080");
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use dprovider::{ProviderConfig, ProviderKind, TransportConfig, TunnelConfig};
use serde::Deserialize;

#[derive(Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_api_provider")]
    pub api_provider: String,

    #[serde(default)]
    pub deepseek_api_key: Option<String>,
    #[serde(default)]
    pub deepseek_base_url: Option<String>,
    #[serde(default)]
    pub deepseek_model: Option<String>,

    #[serde(default)]
    pub google_api_key: Option<String>,
    #[serde(default)]
    pub gemini_base_url: Option<String>,
    #[serde(default)]
    pub gemini_model: Option<String>,

    #[serde(default)]
    pub huggingface_api_key: Option<String>,
    #[serde(default)]
    pub huggingface_base_url: Option<String>,
    #[serde(default)]
    pub huggingface_model: Option<String>,

    #[serde(default)]
    pub use_proxy: bool,
    #[serde(default = "default_proxy_host")]
    pub proxy_host: String,
    #[serde(default = "default_proxy_port")]
    pub proxy_port: u16,

    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_image_save_path")]
    pub image_save_path: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_provider() -> String {
    "deepseek".to_string()
}

fn default_proxy_host() -> String {
    "127.0.0.1".to_string()
}

fn default_proxy_port() -> u16 {
    7890
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_image_save_path() -> String {
    "./generated_images".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(config::Environment::default())
    }

    /// Loads from an explicit variable set instead of the process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect::<config::Map<String, String>>();
        Self::load(config::Environment::default().source(Some(source)))
    }

    fn load(environment: config::Environment) -> Result<Self, ConfigError> {
        let loaded: Self = config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.primary_kind()?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "REQUEST_TIMEOUT_SECS",
                "must be greater than zero",
            ));
        }
        if self.use_proxy && self.proxy_host.trim().is_empty() {
            return Err(ConfigError::invalid(
                "PROXY_HOST",
                "must not be blank when USE_PROXY is enabled",
            ));
        }
        if self.image_save_path.trim().is_empty() {
            return Err(ConfigError::invalid("IMAGE_SAVE_PATH", "must not be blank"));
        }
        Ok(())
    }

    /// Text provider tried first. Image-only providers are rejected.
    pub fn primary_kind(&self) -> Result<ProviderKind, ConfigError> {
        match self.api_provider.parse::<ProviderKind>() {
            Ok(kind @ (ProviderKind::DeepSeek | ProviderKind::Gemini)) => Ok(kind),
            Ok(ProviderKind::HuggingFace) => Err(ConfigError::invalid(
                "API_PROVIDER",
                "huggingface only generates images; use deepseek or gemini",
            )),
            Err(err) => Err(ConfigError::invalid("API_PROVIDER", err.message)),
        }
    }

    pub fn secondary_kind(&self) -> Result<ProviderKind, ConfigError> {
        Ok(match self.primary_kind()? {
            ProviderKind::DeepSeek => ProviderKind::Gemini,
            _ => ProviderKind::DeepSeek,
        })
    }

    /// `None` unless the provider's key is present and non-blank.
    pub fn provider_config(&self, kind: ProviderKind) -> Option<ProviderConfig> {
        let (key, base_url, model) = match kind {
            ProviderKind::DeepSeek => (
                &self.deepseek_api_key,
                &self.deepseek_base_url,
                &self.deepseek_model,
            ),
            ProviderKind::Gemini => (
                &self.google_api_key,
                &self.gemini_base_url,
                &self.gemini_model,
            ),
            ProviderKind::HuggingFace => (
                &self.huggingface_api_key,
                &self.huggingface_base_url,
                &self.huggingface_model,
            ),
        };

        let key = key.as_deref().map(str::trim).filter(|key| !key.is_empty())?;
        let mut config = ProviderConfig::new(kind, key);
        if let Some(base_url) = non_blank(base_url) {
            config = config.with_base_url(base_url);
        }
        if let Some(model) = non_blank(model) {
            config = config.with_model(model);
        }
        Some(config)
    }

    pub fn tunnel(&self) -> Option<TunnelConfig> {
        self.use_proxy
            .then(|| TunnelConfig::new(self.proxy_host.trim(), self.proxy_port))
    }

    pub fn transport_config(&self) -> TransportConfig {
        let config =
            TransportConfig::default().with_timeout(Duration::from_secs(self.request_timeout_secs));
        match self.tunnel() {
            Some(tunnel) => config.with_tunnel(tunnel),
            None => config,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn redact(value: &Option<String>) -> &'static str {
    match non_blank(value) {
        Some(_) => "[REDACTED]",
        None => "<unset>",
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("api_provider", &self.api_provider)
            .field("deepseek_api_key", &redact(&self.deepseek_api_key))
            .field("deepseek_base_url", &self.deepseek_base_url)
            .field("deepseek_model", &self.deepseek_model)
            .field("google_api_key", &redact(&self.google_api_key))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("huggingface_api_key", &redact(&self.huggingface_api_key))
            .field("huggingface_base_url", &self.huggingface_base_url)
            .field("huggingface_model", &self.huggingface_model)
            .field("use_proxy", &self.use_proxy)
            .field("proxy_host", &self.proxy_host)
            .field("proxy_port", &self.proxy_port)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("image_save_path", &self.image_save_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Load(config::ConfigError),
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "failed to load configuration: {err}"),
            Self::Invalid { key, message } => write!(f, "invalid {key}: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        Self::Load(err)
    }
}
