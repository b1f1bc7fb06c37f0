//! Tracing and metrics hooks fanned out behind one panic-safe value.

use std::io;
use std::path::Path;
use std::time::Duration;

use dprovider::{CallFailure, ProviderError, ProviderKind, RouteRole, RouterHooks, RouterPolicy};
use dtooling::{DispatchHooks, ToolError, ToolOutput};

use crate::{
    MetricsObservabilityHooks, SafeDispatchHooks, SafeRouterHooks, TracingObservabilityHooks,
};

pub struct StandardObservabilityHooks {
    tracing: SafeRouterHooks<TracingObservabilityHooks>,
    metrics: SafeRouterHooks<MetricsObservabilityHooks>,
    tracing_dispatch: SafeDispatchHooks<TracingObservabilityHooks>,
    metrics_dispatch: SafeDispatchHooks<MetricsObservabilityHooks>,
}

impl Default for StandardObservabilityHooks {
    fn default() -> Self {
        Self {
            tracing: SafeRouterHooks::new(TracingObservabilityHooks),
            metrics: SafeRouterHooks::new(MetricsObservabilityHooks),
            tracing_dispatch: SafeDispatchHooks::new(TracingObservabilityHooks),
            metrics_dispatch: SafeDispatchHooks::new(MetricsObservabilityHooks),
        }
    }
}

impl RouterHooks for StandardObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderKind, role: RouteRole) {
        self.tracing.on_attempt_start(provider, role);
        self.metrics.on_attempt_start(provider, role);
    }

    fn on_attempt_success(&self, provider: ProviderKind, role: RouteRole, elapsed: Duration) {
        self.tracing.on_attempt_success(provider, role, elapsed);
        self.metrics.on_attempt_success(provider, role, elapsed);
    }

    fn on_attempt_failure(
        &self,
        provider: ProviderKind,
        role: RouteRole,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        self.tracing.on_attempt_failure(provider, role, error, elapsed);
        self.metrics.on_attempt_failure(provider, role, error, elapsed);
    }

    fn on_failover(&self, from: ProviderKind, to: ProviderKind, error: Option<&ProviderError>) {
        self.tracing.on_failover(from, to, error);
        self.metrics.on_failover(from, to, error);
    }

    fn on_exhausted(&self, policy: &RouterPolicy, failure: &CallFailure) {
        self.tracing.on_exhausted(policy, failure);
        self.metrics.on_exhausted(policy, failure);
    }
}

impl DispatchHooks for StandardObservabilityHooks {
    fn on_dispatch_start(&self, tool_name: &str) {
        self.tracing_dispatch.on_dispatch_start(tool_name);
        self.metrics_dispatch.on_dispatch_start(tool_name);
    }

    fn on_dispatch_success(&self, tool_name: &str, output: &ToolOutput, elapsed: Duration) {
        self.tracing_dispatch
            .on_dispatch_success(tool_name, output, elapsed);
        self.metrics_dispatch
            .on_dispatch_success(tool_name, output, elapsed);
    }

    fn on_dispatch_failure(&self, tool_name: &str, error: &ToolError, elapsed: Duration) {
        self.tracing_dispatch
            .on_dispatch_failure(tool_name, error, elapsed);
        self.metrics_dispatch
            .on_dispatch_failure(tool_name, error, elapsed);
    }

    fn on_image_saved(&self, tool_name: &str, path: &Path, size_bytes: usize) {
        self.tracing_dispatch
            .on_image_saved(tool_name, path, size_bytes);
        self.metrics_dispatch
            .on_image_saved(tool_name, path, size_bytes);
    }

    fn on_image_save_failure(&self, tool_name: &str, error: &io::Error) {
        self.tracing_dispatch.on_image_save_failure(tool_name, error);
        self.metrics_dispatch.on_image_save_failure(tool_name, error);
    }
}
