use thiserror::Error;

/// Core error type for the ignis container and lifecycle orchestrator
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid provider: {message}")]
    InvalidProvider { message: String },

    #[error("Provider already registered for type: {service_type}")]
    DuplicateProvider { service_type: String },

    #[error("Circular dependency detected: {path} (cycle at: {cycle_service})")]
    CircularDependency { path: String, cycle_service: String },

    #[error("No provider registered for type: {service_type}")]
    ProviderNotFound { service_type: String },

    #[error("Request scope required for request-scoped provider: {service_type}")]
    ScopeRequired { service_type: String },

    #[error("Dependency resolution failed for '{service_type}': {message}")]
    DependencyResolutionFailed {
        service_type: String,
        message: String,
    },

    #[error("Lock error on resource: {resource}")]
    LockError { resource: String },

    #[error("Lifecycle error in '{participant}' during '{phase}': {message}")]
    LifecycleError {
        participant: String,
        phase: String,
        message: String,
    },

    #[error("Module error: {message}")]
    Module { message: String },
}

impl CoreError {
    /// Create a new invalid provider error
    pub fn invalid_provider(message: impl Into<String>) -> Self {
        Self::InvalidProvider {
            message: message.into(),
        }
    }

    /// Create a new provider not found error
    pub fn provider_not_found(service_type: impl Into<String>) -> Self {
        Self::ProviderNotFound {
            service_type: service_type.into(),
        }
    }

    /// Create a new lifecycle error
    pub fn lifecycle(
        participant: impl Into<String>,
        phase: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::LifecycleError {
            participant: participant.into(),
            phase: phase.into(),
            message: message.into(),
        }
    }

    /// Create a new module error
    pub fn module(message: impl Into<String>) -> Self {
        Self::Module {
            message: message.into(),
        }
    }

    /// Check if the error is a circular dependency error
    pub fn is_circular_dependency(&self) -> bool {
        matches!(self, Self::CircularDependency { .. })
    }

    /// Check if the error is a resolution-side error
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Self::ProviderNotFound { .. }
                | Self::ScopeRequired { .. }
                | Self::DependencyResolutionFailed { .. }
        )
    }
}
