//! HTTP tool service over DeepSeek and Gemini with failover routing.
//!
//! `duet` loads [`ServerConfig`] from the environment, registers the text
//! providers that have keys, and serves the built-in tool catalogue through an
//! axum [`Router`](axum::Router).
//!
//! ```rust
//! use duet::{AppState, ServerConfig, build_router, build_runtime};
//!
//! let config = ServerConfig::from_vars([("DEEPSEEK_API_KEY", "sk-example")])
//!     .expect("config should load");
//! let runtime = build_runtime(&config).expect("runtime should build");
//! assert!(runtime.has_text_provider());
//!
//! let _router = build_router(AppState::new(runtime));
//! ```

pub mod app;
pub mod config;
pub mod envelope;
mod error;
pub mod runtime;

pub use app::{AppState, build_router};
pub use config::{ConfigError, ServerConfig};
pub use error::StartupError;
pub use runtime::{ServiceInfo, ServiceRuntime, build_runtime, build_runtime_with_transport};
