use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use crate::errors::CoreError;
use crate::lifecycle::hooks::{LifecycleHook, Module};
use crate::lifecycle::state::LifecycleState;

type BoxedHookFuture = Pin<Box<dyn Future<Output = Result<(), CoreError>> + Send>>;

/// Ad-hoc callback invoked once during the shutdown phase
pub type ShutdownHook = Box<dyn Fn() -> BoxedHookFuture + Send + Sync>;

/// Application lifecycle orchestrator.
///
/// Tracks the current phase and dispatches lifecycle callbacks on registered
/// modules and providers: forward, fail-fast for startup phases; best-effort
/// (and reverse order for destroy) during teardown. Hooks run strictly
/// sequentially on the calling task — later teardown hooks may depend on
/// resources released by earlier ones.
///
/// Participants are registered during application assembly (`&mut self`),
/// then phases are driven through `&self`; registration during phase
/// execution is impossible by construction. Phase methods are `async` and
/// carry no timeout of their own — the embedding application awaits them
/// under its own deadline.
pub struct LifecycleManager {
    state: RwLock<LifecycleState>,
    modules: Vec<Arc<dyn Module>>,
    providers: Vec<Arc<dyn LifecycleHook>>,
    shutdown_hooks: Vec<ShutdownHook>,
}

impl LifecycleManager {
    /// Create a new lifecycle manager in the `NotStarted` phase
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LifecycleState::NotStarted),
            modules: Vec::new(),
            providers: Vec::new(),
            shutdown_hooks: Vec::new(),
        }
    }

    /// Register module participants, appended in order
    pub fn register_modules(&mut self, modules: Vec<Arc<dyn Module>>) {
        self.modules.extend(modules);
    }

    /// Register provider participants, appended in order
    pub fn register_providers(&mut self, providers: Vec<Arc<dyn LifecycleHook>>) {
        self.providers.extend(providers);
    }

    /// Register a callback invoked during [`LifecycleManager::run_app_shutdown`],
    /// after all module and provider shutdown hooks, in registration order
    pub fn register_shutdown_hook<F, Fut>(&mut self, hook: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CoreError>> + Send + 'static,
    {
        self.shutdown_hooks.push(Box::new(move || Box::pin(hook())));
    }

    /// Run `on_module_init` on every module, then every provider, in
    /// registration order.
    ///
    /// Fail-fast: the first error aborts the phase immediately and is
    /// returned unchanged; later participants are never invoked.
    pub async fn run_module_init(&self) -> Result<(), CoreError> {
        self.advance_state(LifecycleState::ModuleInit);
        tracing::info!(
            modules = self.modules.len(),
            providers = self.providers.len(),
            "running module init hooks"
        );

        for module in &self.modules {
            if let Err(err) = module.on_module_init().await {
                tracing::error!(
                    participant = module.name(),
                    error = %err,
                    "module init hook failed, aborting startup"
                );
                return Err(err);
            }
        }
        for provider in &self.providers {
            if let Err(err) = provider.on_module_init().await {
                tracing::error!(
                    participant = provider.name(),
                    error = %err,
                    "provider init hook failed, aborting startup"
                );
                return Err(err);
            }
        }

        Ok(())
    }

    /// Run `on_application_bootstrap` on every module, then every provider.
    ///
    /// Same fail-fast semantics as [`LifecycleManager::run_module_init`];
    /// on full success the state advances to `Running`.
    pub async fn run_app_bootstrap(&self) -> Result<(), CoreError> {
        self.advance_state(LifecycleState::AppBootstrap);
        tracing::info!("running application bootstrap hooks");

        for module in &self.modules {
            if let Err(err) = module.on_application_bootstrap().await {
                tracing::error!(
                    participant = module.name(),
                    error = %err,
                    "bootstrap hook failed, aborting startup"
                );
                return Err(err);
            }
        }
        for provider in &self.providers {
            if let Err(err) = provider.on_application_bootstrap().await {
                tracing::error!(
                    participant = provider.name(),
                    error = %err,
                    "bootstrap hook failed, aborting startup"
                );
                return Err(err);
            }
        }

        self.advance_state(LifecycleState::Running);
        Ok(())
    }

    /// Run `on_application_shutdown` on every module, then every provider,
    /// then every registered shutdown callback, all in registration order.
    ///
    /// Best-effort: every participant is invoked regardless of earlier
    /// failures. Errors are logged and returned aggregated; an empty vector
    /// means a clean shutdown.
    pub async fn run_app_shutdown(&self) -> Vec<CoreError> {
        self.advance_state(LifecycleState::AppShutdown);
        tracing::info!("running application shutdown hooks");
        let mut errors = Vec::new();

        for module in &self.modules {
            if let Err(err) = module.on_application_shutdown().await {
                tracing::warn!(participant = module.name(), error = %err, "shutdown hook failed");
                errors.push(CoreError::lifecycle(
                    module.name(),
                    "app-shutdown",
                    err.to_string(),
                ));
            }
        }
        for provider in &self.providers {
            if let Err(err) = provider.on_application_shutdown().await {
                tracing::warn!(participant = provider.name(), error = %err, "shutdown hook failed");
                errors.push(CoreError::lifecycle(
                    provider.name(),
                    "app-shutdown",
                    err.to_string(),
                ));
            }
        }
        for hook in &self.shutdown_hooks {
            if let Err(err) = (hook)().await {
                tracing::warn!(error = %err, "shutdown callback failed");
                errors.push(CoreError::lifecycle(
                    "shutdown-hook",
                    "app-shutdown",
                    err.to_string(),
                ));
            }
        }

        errors
    }

    /// Run `on_module_destroy` on modules, then providers, each in
    /// **reverse** registration order (last registered, first destroyed).
    ///
    /// Best-effort, like [`LifecycleManager::run_app_shutdown`].
    pub async fn run_module_destroy(&self) -> Vec<CoreError> {
        self.advance_state(LifecycleState::ModuleDestroy);
        tracing::info!("running module destroy hooks");
        let mut errors = Vec::new();

        for module in self.modules.iter().rev() {
            if let Err(err) = module.on_module_destroy().await {
                tracing::warn!(participant = module.name(), error = %err, "destroy hook failed");
                errors.push(CoreError::lifecycle(
                    module.name(),
                    "module-destroy",
                    err.to_string(),
                ));
            }
        }
        for provider in self.providers.iter().rev() {
            if let Err(err) = provider.on_module_destroy().await {
                tracing::warn!(participant = provider.name(), error = %err, "destroy hook failed");
                errors.push(CoreError::lifecycle(
                    provider.name(),
                    "module-destroy",
                    err.to_string(),
                ));
            }
        }

        errors
    }

    /// Thread-safe snapshot of the current lifecycle phase
    pub fn state(&self) -> LifecycleState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Get the number of registered module participants
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Get the number of registered provider participants
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Advance the phase; transitions backwards are ignored so the state
    /// is monotonically non-decreasing
    fn advance_state(&self, next: LifecycleState) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if next > *state {
            *state = next;
        }
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("state", &self.state())
            .field("modules", &self.modules.len())
            .field("providers", &self.providers.len())
            .field("shutdown_hooks", &self.shutdown_hooks.len())
            .finish()
    }
}
