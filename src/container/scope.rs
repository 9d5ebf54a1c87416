use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::container::descriptor::ServiceId;
use crate::errors::CoreError;

/// Provider scope enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceScope {
    /// Single instance shared for the process lifetime
    Singleton,
    /// New instance created for every resolution
    Transient,
    /// One instance per request scope handle, for the handle's lifetime
    RequestScoped,
}

impl ServiceScope {
    /// Check if the scope is singleton
    pub fn is_singleton(&self) -> bool {
        matches!(self, ServiceScope::Singleton)
    }

    /// Check if the scope is transient
    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceScope::Transient)
    }

    /// Check if the scope is request-scoped
    pub fn is_request_scoped(&self) -> bool {
        matches!(self, ServiceScope::RequestScoped)
    }

    /// Get the scope name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceScope::Singleton => "singleton",
            ServiceScope::Transient => "transient",
            ServiceScope::RequestScoped => "request-scoped",
        }
    }
}

impl Default for ServiceScope {
    fn default() -> Self {
        ServiceScope::Singleton
    }
}

impl std::fmt::Display for ServiceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ServiceScope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "singleton" => Ok(ServiceScope::Singleton),
            "transient" => Ok(ServiceScope::Transient),
            "request-scoped" | "request_scoped" => Ok(ServiceScope::RequestScoped),
            _ => Err(CoreError::invalid_provider(format!(
                "unknown provider scope: {}",
                s
            ))),
        }
    }
}

/// Opaque request-context handle holding the per-request instance cache.
///
/// The handle is owned by the caller, typically one per inbound request.
/// Resolving a request-scoped provider against the same handle always yields
/// the same instance; dropping the handle releases every cached instance.
pub struct RequestScope {
    scope_id: uuid::Uuid,
    instances: Mutex<HashMap<ServiceId, Arc<dyn Any + Send + Sync>>>,
}

impl RequestScope {
    /// Create a new, empty request scope
    pub fn new() -> Self {
        Self {
            scope_id: uuid::Uuid::new_v4(),
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Get the scope ID
    pub fn scope_id(&self) -> uuid::Uuid {
        self.scope_id
    }

    /// Look up a cached instance for a provider
    pub(crate) fn get(&self, id: &ServiceId) -> Result<Option<Arc<dyn Any + Send + Sync>>, CoreError> {
        let instances = self.lock()?;
        Ok(instances.get(id).cloned())
    }

    /// Store an instance unless one is already cached for the provider.
    ///
    /// The first stored instance wins; a racing construction for the same
    /// scope is discarded so at most one cache entry ever exists per
    /// (provider, scope) pair. Returns the cached instance.
    pub(crate) fn insert_if_vacant(
        &self,
        id: ServiceId,
        instance: Arc<dyn Any + Send + Sync>,
    ) -> Result<Arc<dyn Any + Send + Sync>, CoreError> {
        let mut instances = self.lock()?;
        Ok(instances.entry(id).or_insert(instance).clone())
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<ServiceId, Arc<dyn Any + Send + Sync>>>, CoreError>
    {
        self.instances.lock().map_err(|_| CoreError::LockError {
            resource: "request_scope".to_string(),
        })
    }

    /// Check if an instance is cached for a type
    pub fn contains<T: 'static>(&self) -> bool {
        self.instances
            .lock()
            .map(|instances| instances.contains_key(&ServiceId::of::<T>()))
            .unwrap_or(false)
    }

    /// Get the number of cached instances
    pub fn instance_count(&self) -> usize {
        self.instances
            .lock()
            .map(|instances| instances.len())
            .unwrap_or(0)
    }

    /// Explicit teardown: drop every instance cached in this scope.
    ///
    /// Useful when the handle itself is pooled or outlives the logical
    /// request it served.
    pub fn clear(&self) {
        if let Ok(mut instances) = self.instances.lock() {
            instances.clear();
        }
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RequestScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestScope")
            .field("scope_id", &self.scope_id)
            .field("instance_count", &self.instance_count())
            .finish()
    }
}
