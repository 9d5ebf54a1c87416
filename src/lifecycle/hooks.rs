use async_trait::async_trait;

use crate::errors::CoreError;

/// Optional lifecycle callbacks for hook participants.
///
/// A participant is a concrete module or provider instance registered with
/// the [`LifecycleManager`](crate::lifecycle::LifecycleManager); it overrides
/// the callbacks it cares about and inherits no-ops for the rest. Factories
/// are never participants: registration is by `Arc<dyn LifecycleHook>`, so
/// only instances can receive callbacks.
///
/// Startup callbacks (`on_module_init`, `on_application_bootstrap`) abort
/// their phase on the first error. Teardown callbacks
/// (`on_application_shutdown`, `on_module_destroy`) are best-effort; an
/// error is collected and the phase continues.
#[async_trait]
pub trait LifecycleHook: Send + Sync {
    /// Name used in phase logs and error context
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Called while modules are initialized, before the application
    /// accepts any work
    async fn on_module_init(&self) -> Result<(), CoreError> {
        Ok(())
    }

    /// Called after all modules are initialized, immediately before the
    /// application starts running
    async fn on_application_bootstrap(&self) -> Result<(), CoreError> {
        Ok(())
    }

    /// Called when shutdown begins, before module destruction
    async fn on_application_shutdown(&self) -> Result<(), CoreError> {
        Ok(())
    }

    /// Called during final teardown, in reverse registration order
    async fn on_module_destroy(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

/// A module participant.
///
/// Modules are dispatched before provider participants within every phase,
/// and may install their providers into a container when driven through the
/// [`ModuleRegistry`](crate::modules::ModuleRegistry).
pub trait Module: LifecycleHook {
    /// Install this module's providers into the container.
    ///
    /// Runs once during application assembly, before any phase executes.
    fn configure(&self, _container: &mut crate::container::Container) -> Result<(), CoreError> {
        Ok(())
    }
}
