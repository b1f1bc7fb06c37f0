//! Tracing-based observability hooks for routing and dispatch.
//!
//! ```rust
//! use dobserve::TracingObservabilityHooks;
//! use dprovider::RouterHooks;
//!
//! fn accepts_router_hooks(_hooks: &dyn RouterHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_router_hooks(&hooks);
//! ```

use std::io;
use std::path::Path;
use std::time::Duration;

use dprovider::{CallFailure, ProviderError, ProviderKind, RouteRole, RouterHooks, RouterPolicy};
use dtooling::{DispatchHooks, ToolError, ToolOutput};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl RouterHooks for TracingObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderKind, role: RouteRole) {
        tracing::debug!(
            phase = "router",
            event = "attempt_start",
            provider = %provider,
            role = %role
        );
    }

    fn on_attempt_success(&self, provider: ProviderKind, role: RouteRole, elapsed: Duration) {
        tracing::info!(
            phase = "router",
            event = "attempt_success",
            provider = %provider,
            role = %role,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_attempt_failure(
        &self,
        provider: ProviderKind,
        role: RouteRole,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        tracing::warn!(
            phase = "router",
            event = "attempt_failure",
            provider = %provider,
            role = %role,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_failover(&self, from: ProviderKind, to: ProviderKind, error: Option<&ProviderError>) {
        tracing::warn!(
            phase = "router",
            event = "failover",
            from = %from,
            to = %to,
            primary_registered = error.is_some(),
            error_kind = ?error.map(|error| error.kind)
        );
    }

    fn on_exhausted(&self, policy: &RouterPolicy, failure: &CallFailure) {
        tracing::error!(
            phase = "router",
            event = "exhausted",
            primary = %policy.primary,
            secondary = ?policy.secondary.map(ProviderKind::as_str),
            error = %failure
        );
    }
}

impl DispatchHooks for TracingObservabilityHooks {
    fn on_dispatch_start(&self, tool_name: &str) {
        tracing::info!(phase = "tool", event = "dispatch_start", tool_name);
    }

    fn on_dispatch_success(&self, tool_name: &str, output: &ToolOutput, elapsed: Duration) {
        tracing::info!(
            phase = "tool",
            event = "dispatch_success",
            tool_name,
            provider = output.provider_label(),
            elapsed_ms = elapsed.as_millis() as u64,
            output_chars = output.text.chars().count()
        );
    }

    fn on_dispatch_failure(&self, tool_name: &str, error: &ToolError, elapsed: Duration) {
        if error.is_user_error() {
            tracing::warn!(
                phase = "tool",
                event = "dispatch_rejected",
                tool_name,
                elapsed_ms = elapsed.as_millis() as u64,
                error_kind = ?error.kind,
                error = %error
            );
        } else {
            tracing::error!(
                phase = "tool",
                event = "dispatch_failure",
                tool_name,
                elapsed_ms = elapsed.as_millis() as u64,
                error_kind = ?error.kind,
                retryable = error.retryable,
                retry_after_secs = error.retry_after.map(|delay| delay.as_secs()),
                error = %error
            );
        }
    }

    fn on_image_saved(&self, tool_name: &str, path: &Path, size_bytes: usize) {
        tracing::info!(
            phase = "tool",
            event = "image_saved",
            tool_name,
            path = %path.display(),
            size_bytes
        );
    }

    fn on_image_save_failure(&self, tool_name: &str, error: &io::Error) {
        tracing::warn!(
            phase = "tool",
            event = "image_save_failure",
            tool_name,
            error = %error
        );
    }
}
