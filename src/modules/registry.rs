use std::collections::HashSet;
use std::sync::Arc;

use crate::container::Container;
use crate::errors::CoreError;
use crate::lifecycle::{LifecycleManager, Module};

/// Ordered collection of application modules.
///
/// Modules are keyed by [`Module::name`]; registering two modules under the
/// same name is an error. Registration order is preserved and carries
/// through to provider configuration and lifecycle dispatch.
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
    names: HashSet<&'static str>,
}

impl ModuleRegistry {
    /// Create an empty module registry
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Register a module, rejecting duplicate names
    pub fn register(&mut self, module: Arc<dyn Module>) -> Result<(), CoreError> {
        let name = module.name();
        if !self.names.insert(name) {
            return Err(CoreError::module(format!(
                "module '{}' is already registered",
                name
            )));
        }

        tracing::debug!(module = name, "registered module");
        self.modules.push(module);
        Ok(())
    }

    /// Let every module register its providers into the container, in
    /// registration order.
    ///
    /// Fail-fast: the first configuration error aborts and is returned.
    pub fn configure_all(&self, container: &mut Container) -> Result<(), CoreError> {
        for module in &self.modules {
            tracing::info!(module = module.name(), "configuring module");
            module.configure(container).map_err(|err| {
                tracing::error!(module = module.name(), error = %err, "module configuration failed");
                err
            })?;
        }
        Ok(())
    }

    /// Hand all modules to the lifecycle manager as phase participants,
    /// preserving registration order
    pub fn install_into(&self, manager: &mut LifecycleManager) {
        manager.register_modules(self.modules.clone());
    }

    /// Get the number of registered modules
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Check whether a module with the given name is registered
    pub fn has_module(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Get the registered modules in registration order
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.modules.len())
            .finish()
    }
}
