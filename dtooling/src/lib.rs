//! Tool catalogue, argument validation, and dispatch.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use dprovider::{FailoverRouter, ProviderKind, ProviderRegistry, RouterPolicy};
//! use dtooling::{ToolDispatcher, catalog::builtin_registry};
//!
//! let router = FailoverRouter::new(
//!     Arc::new(ProviderRegistry::new()),
//!     RouterPolicy::primary_only(ProviderKind::DeepSeek),
//! );
//! let dispatcher = ToolDispatcher::new(Arc::new(builtin_registry()), Arc::new(router));
//! assert!(dispatcher.registry().contains("enhance_prompt"));
//! ```

pub mod catalog;
mod dispatcher;
mod error;
mod hooks;
mod registry;
mod schema;
mod sink;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        ArgumentSchema, ArgumentSpec, DispatchHooks, FsImageSink, ImageSink, Tool,
        ToolArguments, ToolDispatcher, ToolError, ToolErrorKind, ToolOutput, ToolPlan,
        ToolRegistry,
    };
}

pub use dispatcher::ToolDispatcher;
pub use error::{ToolError, ToolErrorKind};
pub use hooks::{DispatchHooks, NoopDispatchHooks};
pub use registry::ToolRegistry;
pub use schema::{ArgumentKind, ArgumentSchema, ArgumentSpec, ToolArguments};
pub use sink::{FsImageSink, ImageSink};
pub use tool::{FunctionTool, ImagePlan, Tool, ToolPlan};
pub use types::{ImageArtifact, LOCAL_PROVIDER, ToolDefinition, ToolOutput};
