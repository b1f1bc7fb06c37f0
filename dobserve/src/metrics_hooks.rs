//! Metrics-based observability hooks for routing and dispatch.
//!
//! ```rust
//! use dobserve::MetricsObservabilityHooks;
//! use dtooling::DispatchHooks;
//!
//! fn accepts_dispatch_hooks(_hooks: &dyn DispatchHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_dispatch_hooks(&hooks);
//! ```

use std::io;
use std::path::Path;
use std::time::Duration;

use dprovider::{CallFailure, ProviderError, ProviderKind, RouteRole, RouterHooks, RouterPolicy};
use dtooling::{DispatchHooks, ToolError, ToolOutput};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl RouterHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderKind, role: RouteRole) {
        metrics::counter!(
            "duet_router_attempt_start_total",
            "provider" => provider.as_str(),
            "role" => role.to_string()
        )
        .increment(1);
    }

    fn on_attempt_success(&self, provider: ProviderKind, role: RouteRole, elapsed: Duration) {
        metrics::counter!(
            "duet_router_attempt_success_total",
            "provider" => provider.as_str(),
            "role" => role.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "duet_router_attempt_duration_seconds",
            "provider" => provider.as_str(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_attempt_failure(
        &self,
        provider: ProviderKind,
        role: RouteRole,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "duet_router_attempt_failure_total",
            "provider" => provider.as_str(),
            "role" => role.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "duet_router_attempt_duration_seconds",
            "provider" => provider.as_str(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_failover(&self, from: ProviderKind, to: ProviderKind, _error: Option<&ProviderError>) {
        metrics::counter!(
            "duet_router_failover_total",
            "from" => from.as_str(),
            "to" => to.as_str()
        )
        .increment(1);
    }

    fn on_exhausted(&self, policy: &RouterPolicy, _failure: &CallFailure) {
        metrics::counter!(
            "duet_router_exhausted_total",
            "primary" => policy.primary.as_str()
        )
        .increment(1);
    }
}

impl DispatchHooks for MetricsObservabilityHooks {
    fn on_dispatch_start(&self, tool_name: &str) {
        metrics::counter!(
            "duet_tool_dispatch_start_total",
            "tool_name" => tool_name.to_string()
        )
        .increment(1);
    }

    fn on_dispatch_success(&self, tool_name: &str, output: &ToolOutput, elapsed: Duration) {
        metrics::counter!(
            "duet_tool_dispatch_success_total",
            "tool_name" => tool_name.to_string(),
            "provider" => output.provider_label()
        )
        .increment(1);
        metrics::histogram!(
            "duet_tool_dispatch_duration_seconds",
            "tool_name" => tool_name.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_dispatch_failure(&self, tool_name: &str, error: &ToolError, elapsed: Duration) {
        metrics::counter!(
            "duet_tool_dispatch_failure_total",
            "tool_name" => tool_name.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "duet_tool_dispatch_duration_seconds",
            "tool_name" => tool_name.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_image_saved(&self, tool_name: &str, _path: &Path, size_bytes: usize) {
        metrics::counter!(
            "duet_image_saved_total",
            "tool_name" => tool_name.to_string()
        )
        .increment(1);
        metrics::histogram!("duet_image_size_bytes").record(size_bytes as f64);
    }

    fn on_image_save_failure(&self, tool_name: &str, error: &io::Error) {
        metrics::counter!(
            "duet_image_save_failure_total",
            "tool_name" => tool_name.to_string(),
            "error_kind" => format!("{:?}", error.kind())
        )
        .increment(1);
    }
}
