use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

use crate::container::container::Injector;
use crate::container::scope::ServiceScope;
use crate::errors::CoreError;

/// Stable type token identifying a produced type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceId {
    pub type_id: TypeId,
    pub type_name: &'static str,
}

impl ServiceId {
    /// Create a new service ID for a type
    pub fn of<T: 'static + ?Sized>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name)
    }
}

/// Constructor function for provider instances.
///
/// Factories pull their constructor parameters through the [`Injector`],
/// which propagates the active request scope into nested resolutions.
pub type ProviderFactory = Box<
    dyn for<'a> Fn(&Injector<'a>) -> Result<Box<dyn Any + Send + Sync>, CoreError> + Send + Sync,
>;

/// A registered provider: produced type, constructor, scope, and the
/// dependency types the constructor pulls through the injector.
pub struct ProviderDescriptor {
    /// Produced type token
    pub service_id: ServiceId,
    /// Instance lifetime policy
    pub scope: ServiceScope,
    /// Declared constructor parameter types, walked at registration time
    /// for cycle detection
    pub dependencies: Vec<ServiceId>,
    factory: ProviderFactory,
    /// Cached singleton instance with its own lock, so unrelated singleton
    /// resolutions never serialize against each other
    singleton: RwLock<Option<Arc<dyn Any + Send + Sync>>>,
}

impl std::fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("service_id", &self.service_id)
            .field("scope", &self.scope)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

impl ProviderDescriptor {
    /// Start building a singleton provider for `T`
    pub fn singleton<T: Send + Sync + 'static>() -> ProviderBuilder<T> {
        ProviderBuilder::new(ServiceScope::Singleton)
    }

    /// Start building a transient provider for `T`
    pub fn transient<T: Send + Sync + 'static>() -> ProviderBuilder<T> {
        ProviderBuilder::new(ServiceScope::Transient)
    }

    /// Start building a request-scoped provider for `T`
    pub fn request_scoped<T: Send + Sync + 'static>() -> ProviderBuilder<T> {
        ProviderBuilder::new(ServiceScope::RequestScoped)
    }

    /// Run the constructor, yielding a fresh instance
    pub(crate) fn instantiate(
        &self,
        injector: &Injector<'_>,
    ) -> Result<Arc<dyn Any + Send + Sync>, CoreError> {
        let instance = (self.factory)(injector)?;
        tracing::debug!(
            service = self.service_id.type_name(),
            scope = self.scope.as_str(),
            "constructed provider instance"
        );
        Ok(Arc::from(instance))
    }

    /// Return the cached singleton, constructing it on first resolution.
    ///
    /// Double-checked: shared-lock fast path, then an exclusive re-check so
    /// exactly one construction occurs even under concurrent first-time
    /// resolution. Nested resolutions during construction take other
    /// providers' locks only; the registered graph is acyclic, so the
    /// acquisition order follows a topological order and cannot deadlock.
    pub(crate) fn resolve_singleton(
        &self,
        injector: &Injector<'_>,
    ) -> Result<Arc<dyn Any + Send + Sync>, CoreError> {
        {
            let slot = self.singleton.read().map_err(|_| CoreError::LockError {
                resource: "singleton_slot".to_string(),
            })?;
            if let Some(instance) = slot.as_ref() {
                return Ok(instance.clone());
            }
        }

        let mut slot = self.singleton.write().map_err(|_| CoreError::LockError {
            resource: "singleton_slot".to_string(),
        })?;
        if let Some(instance) = slot.as_ref() {
            return Ok(instance.clone());
        }

        let instance = self.instantiate(injector)?;
        *slot = Some(instance.clone());
        Ok(instance)
    }
}

/// Fluent builder for provider descriptors
pub struct ProviderBuilder<T: Send + Sync + 'static> {
    scope: ServiceScope,
    dependencies: Vec<ServiceId>,
    factory: Option<ProviderFactory>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> ProviderBuilder<T> {
    fn new(scope: ServiceScope) -> Self {
        Self {
            scope,
            dependencies: Vec::new(),
            factory: None,
            _marker: PhantomData,
        }
    }

    /// Declare a constructor parameter type.
    ///
    /// Declared dependencies are what the registration-time cycle walk
    /// follows; a factory that pulls an undeclared type through the injector
    /// still resolves, but only the runtime path guard protects it.
    pub fn depends_on<U: Send + Sync + 'static>(mut self) -> Self {
        self.dependencies.push(ServiceId::of::<U>());
        self
    }

    /// Set the constructor function
    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: for<'a> Fn(&Injector<'a>) -> Result<T, CoreError> + Send + Sync + 'static,
    {
        self.factory = Some(Box::new(move |injector| {
            let instance = factory(injector)?;
            Ok(Box::new(instance) as Box<dyn Any + Send + Sync>)
        }));
        self
    }

    /// Use a pre-built value as the constructor output
    pub fn with_instance(mut self, instance: T) -> Self
    where
        T: Clone,
    {
        self.factory = Some(Box::new(move |_| {
            Ok(Box::new(instance.clone()) as Box<dyn Any + Send + Sync>)
        }));
        self
    }

    /// Build the provider descriptor
    pub fn build(self) -> Result<ProviderDescriptor, CoreError> {
        let factory = self.factory.ok_or_else(|| {
            CoreError::invalid_provider(format!(
                "provider for {} has no constructor",
                std::any::type_name::<T>()
            ))
        })?;

        Ok(ProviderDescriptor {
            service_id: ServiceId::of::<T>(),
            scope: self.scope,
            dependencies: self.dependencies,
            factory,
            singleton: RwLock::new(None),
        })
    }
}
