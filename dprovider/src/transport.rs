//! HTTP transport capability and reqwest-based implementation.
//!
//! Adapters receive an `Arc<dyn HttpTransport>` at construction, so a tunneled
//! transport and a direct one can live side by side.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use dprovider::{TransportConfig, TunnelConfig};
//!
//! let config = TransportConfig::default().with_tunnel(TunnelConfig::new("127.0.0.1", 7890));
//! assert_eq!(config.timeout, Duration::from_secs(30));
//! assert_eq!(
//!     config.tunnel.as_ref().map(TunnelConfig::proxy_url).as_deref(),
//!     Some("socks5h://127.0.0.1:7890")
//! );
//! ```

use std::fmt::{Display, Formatter};
use std::time::Duration;

use dcommon::SecretString;
#[cfg(feature = "transport-reqwest")]
use reqwest::{Client, Proxy};
use serde_json::Value;

use crate::{ProviderError, ProviderFuture};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelConfig {
    pub host: String,
    pub port: u16,
}

impl TunnelConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Proxy URL with remote DNS resolution through the tunnel.
    pub fn proxy_url(&self) -> String {
        format!("socks5h://{}:{}", self.host, self.port)
    }
}

impl Display for TunnelConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.proxy_url())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub tunnel: Option<TunnelConfig>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            tunnel: None,
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tunnel(mut self, tunnel: TunnelConfig) -> Self {
        self.tunnel = Some(tunnel);
        self
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum HttpAuth {
    None,
    Bearer(SecretString),
    Header {
        name: &'static str,
        value: SecretString,
    },
}

impl std::fmt::Debug for HttpAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("HttpAuth::None"),
            Self::Bearer(_) => f.write_str("HttpAuth::Bearer([REDACTED])"),
            Self::Header { name, .. } => write!(f, "HttpAuth::Header({name}: [REDACTED])"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub auth: HttpAuth,
    pub body: Value,
}

impl HttpRequest {
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            auth: HttpAuth::None,
            body,
        }
    }

    pub fn with_auth(mut self, auth: HttpAuth) -> Self {
        self.auth = auth;
        self
    }
}

/// Raw reply; non-success statuses are returned, not raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: body.to_string().into_bytes(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|value| value.starts_with("application/json"))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    fn post_json<'a>(
        &'a self,
        request: HttpRequest,
    ) -> ProviderFuture<'a, Result<HttpResponse, ProviderError>>;
}

#[cfg(feature = "transport-reqwest")]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    tunnel: Option<TunnelConfig>,
}

#[cfg(feature = "transport-reqwest")]
impl ReqwestTransport {
    pub fn from_config(config: &TransportConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder().timeout(config.timeout);

        if let Some(tunnel) = &config.tunnel {
            let proxy = Proxy::all(tunnel.proxy_url())
                .map_err(|err| ProviderError::transport(format!("invalid tunnel: {err}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|err| ProviderError::transport(err.to_string()))?;

        Ok(Self {
            client,
            tunnel: config.tunnel.clone(),
        })
    }

    pub fn tunnel(&self) -> Option<&TunnelConfig> {
        self.tunnel.as_ref()
    }

    fn apply_auth(builder: reqwest::RequestBuilder, auth: &HttpAuth) -> reqwest::RequestBuilder {
        match auth {
            HttpAuth::None => builder,
            HttpAuth::Bearer(token) => builder.bearer_auth(token.expose()),
            HttpAuth::Header { name, value } => builder.header(*name, value.expose()),
        }
    }
}

#[cfg(feature = "transport-reqwest")]
fn map_send_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::timeout(err.to_string())
    } else {
        ProviderError::transport(err.to_string())
    }
}

#[cfg(feature = "transport-reqwest")]
impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        request: HttpRequest,
    ) -> ProviderFuture<'a, Result<HttpResponse, ProviderError>> {
        Box::pin(async move {
            let builder = self.client.post(&request.url).json(&request.body);
            let response = Self::apply_auth(builder, &request.auth)
                .send()
                .await
                .map_err(map_send_error)?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(ToString::to_string);
            let body = response.bytes().await.map_err(map_send_error)?;

            Ok(HttpResponse {
                status,
                content_type,
                body: body.to_vec(),
            })
        })
    }
}
