//! Primary/secondary failover routing over registered text providers.
//!
//! Each provider gets at most one attempt per call. The secondary is only
//! tried when the primary is unregistered or fails, and its outcome is
//! returned as-is.
//!
//! ```rust
//! use dprovider::{ProviderKind, RouterPolicy};
//!
//! let policy = RouterPolicy::new(ProviderKind::DeepSeek, Some(ProviderKind::DeepSeek));
//! assert_eq!(policy.secondary, None);
//!
//! let policy = RouterPolicy::new(ProviderKind::DeepSeek, Some(ProviderKind::Gemini));
//! assert_eq!(policy.order(), vec![ProviderKind::DeepSeek, ProviderKind::Gemini]);
//! ```

use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    CallFailure, CallResult, FailureKind, ModelProvider, Prompt, ProviderError, ProviderKind,
    ProviderRegistry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterPolicy {
    pub primary: ProviderKind,
    pub secondary: Option<ProviderKind>,
}

impl RouterPolicy {
    pub fn new(primary: ProviderKind, secondary: Option<ProviderKind>) -> Self {
        Self {
            primary,
            secondary: secondary.filter(|kind| *kind != primary),
        }
    }

    pub fn primary_only(primary: ProviderKind) -> Self {
        Self::new(primary, None)
    }

    pub fn order(&self) -> Vec<ProviderKind> {
        std::iter::once(self.primary).chain(self.secondary).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRole {
    Primary,
    Secondary,
}

impl Display for RouteRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Secondary => f.write_str("secondary"),
        }
    }
}

pub trait RouterHooks: Send + Sync {
    fn on_attempt_start(&self, _provider: ProviderKind, _role: RouteRole) {}

    fn on_attempt_success(&self, _provider: ProviderKind, _role: RouteRole, _elapsed: Duration) {}

    fn on_attempt_failure(
        &self,
        _provider: ProviderKind,
        _role: RouteRole,
        _error: &ProviderError,
        _elapsed: Duration,
    ) {
    }

    /// `error` is `None` when the primary was not registered.
    fn on_failover(
        &self,
        _from: ProviderKind,
        _to: ProviderKind,
        _error: Option<&ProviderError>,
    ) {
    }

    fn on_exhausted(&self, _policy: &RouterPolicy, _failure: &CallFailure) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRouterHooks;

impl RouterHooks for NoopRouterHooks {}

#[derive(Clone)]
pub struct FailoverRouter {
    registry: Arc<ProviderRegistry>,
    policy: RouterPolicy,
    hooks: Arc<dyn RouterHooks>,
}

impl FailoverRouter {
    pub fn new(registry: Arc<ProviderRegistry>, policy: RouterPolicy) -> Self {
        Self {
            registry,
            policy,
            hooks: Arc::new(NoopRouterHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn RouterHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn policy(&self) -> &RouterPolicy {
        &self.policy
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub async fn route(&self, prompt: &Prompt) -> CallResult {
        self.route_with(&self.policy, prompt).await
    }

    pub async fn route_with(&self, policy: &RouterPolicy, prompt: &Prompt) -> CallResult {
        let mut primary_error = None;

        if let Some(provider) = self.registry.get(policy.primary) {
            match self.attempt(provider.as_ref(), RouteRole::Primary, prompt).await {
                Ok(result) => return result,
                Err(error) => primary_error = Some(error),
            }
        }

        if let Some(provider) = policy.secondary.and_then(|kind| self.registry.get(kind)) {
            self.hooks
                .on_failover(policy.primary, provider.kind(), primary_error.as_ref());
            return match self
                .attempt(provider.as_ref(), RouteRole::Secondary, prompt)
                .await
            {
                Ok(result) => result,
                Err(error) => {
                    CallResult::Failure(CallFailure::from_provider(provider.kind(), &error))
                }
            };
        }

        let failure = exhausted_failure(policy, primary_error.as_ref());
        self.hooks.on_exhausted(policy, &failure);
        CallResult::Failure(failure)
    }

    async fn attempt(
        &self,
        provider: &dyn ModelProvider,
        role: RouteRole,
        prompt: &Prompt,
    ) -> Result<CallResult, ProviderError> {
        let kind = provider.kind();
        self.hooks.on_attempt_start(kind, role);
        let started = Instant::now();

        match provider.complete(prompt).await {
            Ok(mut completion) => {
                completion.provider = kind;
                self.hooks.on_attempt_success(kind, role, started.elapsed());
                Ok(CallResult::Success(completion))
            }
            Err(error) => {
                self.hooks
                    .on_attempt_failure(kind, role, &error, started.elapsed());
                Err(error)
            }
        }
    }
}

impl std::fmt::Debug for FailoverRouter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverRouter")
            .field("registry", &self.registry)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn exhausted_failure(policy: &RouterPolicy, primary_error: Option<&ProviderError>) -> CallFailure {
    match primary_error {
        Some(error) => CallFailure {
            kind: FailureKind::RoutingExhausted,
            message: format!(
                "no provider available: {} failed: {}",
                policy.primary, error.message
            ),
            provider: Some(policy.primary),
            retryable: error.retryable,
            retry_after: error.retry_after,
        },
        None => CallFailure::exhausted(format!(
            "no provider available: {} is not configured",
            policy
                .order()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" or ")
        )),
    }
}
