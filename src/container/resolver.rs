use std::collections::HashMap;

use crate::container::descriptor::{ProviderDescriptor, ServiceId};
use crate::errors::CoreError;

/// Dependency resolution path for cycle detection and error reporting
#[derive(Debug, Clone, Default)]
pub struct ResolutionPath {
    services: Vec<ServiceId>,
}

impl ResolutionPath {
    /// Create a new resolution path
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service to the resolution path
    pub fn push(&mut self, service_id: ServiceId) {
        self.services.push(service_id);
    }

    /// Remove the last service from the resolution path
    pub fn pop(&mut self) -> Option<ServiceId> {
        self.services.pop()
    }

    /// Check if the path contains a service
    pub fn contains(&self, service_id: &ServiceId) -> bool {
        self.services.contains(service_id)
    }

    /// Get the path as a string for error messages
    pub fn path_string(&self) -> String {
        self.services
            .iter()
            .map(|id| id.type_name().to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    pub(crate) fn cycle_error(&self, service_id: &ServiceId) -> CoreError {
        let mut path = self.clone();
        path.push(service_id.clone());
        CoreError::CircularDependency {
            path: path.path_string(),
            cycle_service: service_id.type_name().to_string(),
        }
    }
}

/// Registration-time cycle validator.
///
/// Performs a depth-first walk over a candidate provider's declared
/// dependency types, following every type that already has a registered
/// provider. A type reached while still on the current path is a cycle and
/// rejects the registration before the provider is stored. Dependency types
/// with no registered provider are skipped; if they are registered later,
/// that later registration trips the same walk from the other direction.
pub struct CycleValidator<'a> {
    providers: &'a HashMap<ServiceId, ProviderDescriptor>,
}

impl<'a> CycleValidator<'a> {
    /// Create a validator over the currently registered providers
    pub fn new(providers: &'a HashMap<ServiceId, ProviderDescriptor>) -> Self {
        Self { providers }
    }

    /// Validate that registering `candidate` keeps the graph acyclic
    pub fn validate(&self, candidate: &ProviderDescriptor) -> Result<(), CoreError> {
        let mut path = ResolutionPath::new();
        path.push(candidate.service_id.clone());

        for dependency in &candidate.dependencies {
            self.visit(dependency, &mut path)?;
        }

        Ok(())
    }

    fn visit(&self, service_id: &ServiceId, path: &mut ResolutionPath) -> Result<(), CoreError> {
        if path.contains(service_id) {
            return Err(path.cycle_error(service_id));
        }

        path.push(service_id.clone());

        if let Some(provider) = self.providers.get(service_id) {
            for dependency in &provider.dependencies {
                self.visit(dependency, path)?;
            }
        }

        path.pop();
        Ok(())
    }
}
