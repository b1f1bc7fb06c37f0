//! Observability hooks for failover routing and tool dispatch.
//!
//! ```rust
//! use dobserve::{SafeRouterHooks, StandardObservabilityHooks, TracingObservabilityHooks};
//!
//! let _router_hooks = SafeRouterHooks::new(TracingObservabilityHooks);
//! let _standard = StandardObservabilityHooks::default();
//! ```

mod metrics_hooks;
mod safe_hooks;
mod standard;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::{SafeDispatchHooks, SafeRouterHooks};
pub use standard::StandardObservabilityHooks;
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        MetricsObservabilityHooks, SafeDispatchHooks, SafeRouterHooks,
        StandardObservabilityHooks, TracingObservabilityHooks,
    };
}
