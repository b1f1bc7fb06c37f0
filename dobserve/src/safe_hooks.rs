use std::io;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::time::Duration;

use dprovider::{CallFailure, ProviderError, ProviderKind, RouteRole, RouterHooks, RouterPolicy};
use dtooling::{DispatchHooks, ToolError, ToolOutput};

pub struct SafeRouterHooks<H> {
    inner: H,
}

impl<H> SafeRouterHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> RouterHooks for SafeRouterHooks<H>
where
    H: RouterHooks,
{
    fn on_attempt_start(&self, provider: ProviderKind, role: RouteRole) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_attempt_start(provider, role)
        }));
    }

    fn on_attempt_success(&self, provider: ProviderKind, role: RouteRole, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_attempt_success(provider, role, elapsed)
        }));
    }

    fn on_attempt_failure(
        &self,
        provider: ProviderKind,
        role: RouteRole,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_attempt_failure(provider, role, error, elapsed)
        }));
    }

    fn on_failover(&self, from: ProviderKind, to: ProviderKind, error: Option<&ProviderError>) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_failover(from, to, error)));
    }

    fn on_exhausted(&self, policy: &RouterPolicy, failure: &CallFailure) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_exhausted(policy, failure)));
    }
}

pub struct SafeDispatchHooks<H> {
    inner: H,
}

impl<H> SafeDispatchHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> DispatchHooks for SafeDispatchHooks<H>
where
    H: DispatchHooks,
{
    fn on_dispatch_start(&self, tool_name: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_dispatch_start(tool_name)));
    }

    fn on_dispatch_success(&self, tool_name: &str, output: &ToolOutput, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_dispatch_success(tool_name, output, elapsed)
        }));
    }

    fn on_dispatch_failure(&self, tool_name: &str, error: &ToolError, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_dispatch_failure(tool_name, error, elapsed)
        }));
    }

    fn on_image_saved(&self, tool_name: &str, path: &Path, size_bytes: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_image_saved(tool_name, path, size_bytes)
        }));
    }

    fn on_image_save_failure(&self, tool_name: &str, error: &io::Error) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_image_save_failure(tool_name, error)
        }));
    }
}
