use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::container::descriptor::{ProviderDescriptor, ServiceId};
use crate::container::resolver::{CycleValidator, ResolutionPath};
use crate::container::scope::{RequestScope, ServiceScope};
use crate::errors::CoreError;

/// Dependency injection container.
///
/// An explicit value with no global state: every consumer receives the
/// container by reference, and independent containers can coexist (one per
/// test, for instance). Providers are registered during an assembly step
/// (`&mut self`), after which any number of threads may resolve concurrently.
pub struct Container {
    providers: HashMap<ServiceId, ProviderDescriptor>,
}

impl Container {
    /// Create a new, empty container
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider.
    ///
    /// Walks the descriptor's declared dependency types depth-first before
    /// storing; a circular constructor graph rejects the registration and
    /// the provider is never stored. Registering a second provider for the
    /// same produced type is an error; use [`Container::register_override`]
    /// to replace an entry deliberately.
    pub fn register(&mut self, descriptor: ProviderDescriptor) -> Result<(), CoreError> {
        if self.providers.contains_key(&descriptor.service_id) {
            return Err(CoreError::DuplicateProvider {
                service_type: descriptor.service_id.type_name().to_string(),
            });
        }
        self.insert_validated(descriptor)
    }

    /// Register a provider, replacing any prior entry for the produced type.
    ///
    /// Intended for overrides in tests and composition roots; cycle
    /// validation still applies.
    pub fn register_override(&mut self, descriptor: ProviderDescriptor) -> Result<(), CoreError> {
        self.insert_validated(descriptor)
    }

    fn insert_validated(&mut self, descriptor: ProviderDescriptor) -> Result<(), CoreError> {
        CycleValidator::new(&self.providers).validate(&descriptor)?;

        tracing::debug!(
            service = descriptor.service_id.type_name(),
            scope = descriptor.scope.as_str(),
            dependencies = descriptor.dependencies.len(),
            "registered provider"
        );
        self.providers
            .insert(descriptor.service_id.clone(), descriptor);
        Ok(())
    }

    /// Resolve an instance of `T` following its provider's scope policy.
    ///
    /// Request-scoped providers cannot be resolved this way; they need a
    /// [`RequestScope`] handle via [`Container::resolve_scoped`].
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, CoreError> {
        self.resolve_with(None)
    }

    /// Resolve an instance of `T` within a request scope.
    ///
    /// The scope handle is propagated into nested resolutions, so
    /// request-scoped dependencies anywhere in the constructor graph share
    /// one cache.
    pub fn resolve_scoped<T: Send + Sync + 'static>(
        &self,
        scope: &RequestScope,
    ) -> Result<Arc<T>, CoreError> {
        self.resolve_with(Some(scope))
    }

    /// Try to resolve an instance of `T`, returning `None` on any failure
    pub fn try_resolve<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.resolve::<T>().ok()
    }

    fn resolve_with<T: Send + Sync + 'static>(
        &self,
        scope: Option<&RequestScope>,
    ) -> Result<Arc<T>, CoreError> {
        let injector = Injector::new(self, scope);
        let instance = injector.resolve_id(&ServiceId::of::<T>())?;
        downcast::<T>(instance)
    }

    /// Look up the registered provider for a service ID, without side effects
    pub fn descriptor(&self, service_id: &ServiceId) -> Option<&ProviderDescriptor> {
        self.providers.get(service_id)
    }

    /// Check if a provider is registered for a type
    pub fn contains<T: 'static>(&self) -> bool {
        self.providers.contains_key(&ServiceId::of::<T>())
    }

    /// Get the number of registered providers
    pub fn service_count(&self) -> usize {
        self.providers.len()
    }

    /// Get all registered service IDs
    pub fn registered_services(&self) -> Vec<ServiceId> {
        self.providers.keys().cloned().collect()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("service_count", &self.providers.len())
            .finish()
    }
}

/// Constructor-side view of an in-flight resolution.
///
/// Factories receive an injector to pull their constructor parameters;
/// [`Injector::get`] resolves a parameter type recursively with the same
/// request scope, and [`Injector::request_scope`] hands the ambient request
/// handle itself to constructors that want it directly.
pub struct Injector<'a> {
    container: &'a Container,
    scope: Option<&'a RequestScope>,
    /// Types currently being constructed on this resolution; guards against
    /// cycles the registration walk could not see (undeclared dependencies)
    path: Mutex<ResolutionPath>,
}

impl<'a> Injector<'a> {
    fn new(container: &'a Container, scope: Option<&'a RequestScope>) -> Self {
        Self {
            container,
            scope,
            path: Mutex::new(ResolutionPath::new()),
        }
    }

    /// Resolve a constructor parameter of type `T`.
    ///
    /// Any failure, at any nesting depth, is wrapped with the failing
    /// parameter type and propagated to the original resolve caller.
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, CoreError> {
        let service_id = ServiceId::of::<T>();
        let instance =
            self.resolve_id(&service_id)
                .map_err(|err| CoreError::DependencyResolutionFailed {
                    service_type: service_id.type_name().to_string(),
                    message: err.to_string(),
                })?;
        downcast::<T>(instance)
    }

    /// The request scope this resolution runs under, if any
    pub fn request_scope(&self) -> Option<&'a RequestScope> {
        self.scope
    }

    pub(crate) fn resolve_id(
        &self,
        service_id: &ServiceId,
    ) -> Result<Arc<dyn Any + Send + Sync>, CoreError> {
        let provider = self
            .container
            .providers
            .get(service_id)
            .ok_or_else(|| CoreError::provider_not_found(service_id.type_name()))?;

        self.enter(service_id)?;
        let result = self.dispatch(provider);
        self.leave();
        result
    }

    fn dispatch(
        &self,
        provider: &ProviderDescriptor,
    ) -> Result<Arc<dyn Any + Send + Sync>, CoreError> {
        match provider.scope {
            ServiceScope::Singleton => provider.resolve_singleton(self),
            ServiceScope::Transient => provider.instantiate(self),
            ServiceScope::RequestScoped => {
                let scope = self.scope.ok_or_else(|| CoreError::ScopeRequired {
                    service_type: provider.service_id.type_name().to_string(),
                })?;

                if let Some(instance) = scope.get(&provider.service_id)? {
                    return Ok(instance);
                }

                // Construct outside the scope lock so nested request-scoped
                // parameters can populate the same cache; the first stored
                // instance wins under a race.
                let instance = provider.instantiate(self)?;
                scope.insert_if_vacant(provider.service_id.clone(), instance)
            }
        }
    }

    fn enter(&self, service_id: &ServiceId) -> Result<(), CoreError> {
        let mut path = self.path.lock().map_err(|_| CoreError::LockError {
            resource: "resolution_path".to_string(),
        })?;
        if path.contains(service_id) {
            return Err(path.cycle_error(service_id));
        }
        path.push(service_id.clone());
        Ok(())
    }

    fn leave(&self) {
        if let Ok(mut path) = self.path.lock() {
            path.pop();
        }
    }
}

fn downcast<T: Send + Sync + 'static>(
    instance: Arc<dyn Any + Send + Sync>,
) -> Result<Arc<T>, CoreError> {
    instance.downcast::<T>().map_err(|_| {
        CoreError::invalid_provider(format!(
            "provider for {} produced a value of a different type",
            std::any::type_name::<T>()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::descriptor::ProviderDescriptor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Counter {
        value: AtomicUsize,
    }

    impl Counter {
        fn new() -> Self {
            Self {
                value: AtomicUsize::new(0),
            }
        }
    }

    #[derive(Debug)]
    struct Db {
        url: String,
    }

    #[derive(Debug)]
    struct Repo {
        db: Arc<Db>,
    }

    fn counter_container(scope: ServiceScope) -> Container {
        let mut container = Container::new();
        let builder = match scope {
            ServiceScope::Singleton => ProviderDescriptor::singleton::<Counter>(),
            ServiceScope::Transient => ProviderDescriptor::transient::<Counter>(),
            ServiceScope::RequestScoped => ProviderDescriptor::request_scoped::<Counter>(),
        };
        container
            .register(builder.with_factory(|_| Ok(Counter::new())).build().unwrap())
            .unwrap();
        container
    }

    #[test]
    fn test_singleton_resolutions_share_one_instance() {
        let container = counter_container(ServiceScope::Singleton);

        let first = container.resolve::<Counter>().unwrap();
        let second = container.resolve::<Counter>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));

        // Mutation through one handle is visible through the other
        first.value.store(7, Ordering::SeqCst);
        assert_eq!(second.value.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_transient_resolutions_are_distinct() {
        let container = counter_container(ServiceScope::Transient);

        let first = container.resolve::<Counter>().unwrap();
        let second = container.resolve::<Counter>().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));

        first.value.store(7, Ordering::SeqCst);
        assert_eq!(second.value.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_request_scoped_resolution_follows_the_handle() {
        let container = counter_container(ServiceScope::RequestScoped);
        let scope_a = RequestScope::new();
        let scope_b = RequestScope::new();

        let a1 = container.resolve_scoped::<Counter>(&scope_a).unwrap();
        let a2 = container.resolve_scoped::<Counter>(&scope_a).unwrap();
        let b = container.resolve_scoped::<Counter>(&scope_b).unwrap();

        assert!(Arc::ptr_eq(&a1, &a2));
        assert!(!Arc::ptr_eq(&a1, &b));
    }

    #[test]
    fn test_request_scoped_resolution_requires_a_handle() {
        let container = counter_container(ServiceScope::RequestScoped);

        let err = container.resolve::<Counter>().unwrap_err();
        assert!(matches!(err, CoreError::ScopeRequired { .. }));
    }

    #[test]
    fn test_unregistered_type_is_not_found() {
        let container = Container::new();
        let err = container.resolve::<Counter>().unwrap_err();
        assert!(matches!(err, CoreError::ProviderNotFound { .. }));
        assert!(container.try_resolve::<Counter>().is_none());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut container = counter_container(ServiceScope::Singleton);

        let err = container
            .register(
                ProviderDescriptor::transient::<Counter>()
                    .with_factory(|_| Ok(Counter::new()))
                    .build()
                    .unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateProvider { .. }));

        // Explicit override replaces the entry
        container
            .register_override(
                ProviderDescriptor::transient::<Counter>()
                    .with_factory(|_| Ok(Counter::new()))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let first = container.resolve::<Counter>().unwrap();
        let second = container.resolve::<Counter>().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_transient_repos_share_the_singleton_db() {
        let mut container = Container::new();
        container
            .register(
                ProviderDescriptor::singleton::<Db>()
                    .with_factory(|_| {
                        Ok(Db {
                            url: "postgres://localhost".to_string(),
                        })
                    })
                    .build()
                    .unwrap(),
            )
            .unwrap();
        container
            .register(
                ProviderDescriptor::transient::<Repo>()
                    .depends_on::<Db>()
                    .with_factory(|cx| Ok(Repo { db: cx.get::<Db>()? }))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let repo1 = container.resolve::<Repo>().unwrap();
        let repo2 = container.resolve::<Repo>().unwrap();

        assert!(!Arc::ptr_eq(&repo1, &repo2));
        assert!(Arc::ptr_eq(&repo1.db, &repo2.db));
        assert_eq!(repo1.db.url, "postgres://localhost");
    }

    #[test]
    fn test_construction_failure_names_the_failing_parameter() {
        let mut container = Container::new();
        container
            .register(
                ProviderDescriptor::singleton::<Db>()
                    .with_factory(|_| {
                        Err(CoreError::invalid_provider("connection refused"))
                    })
                    .build()
                    .unwrap(),
            )
            .unwrap();
        container
            .register(
                ProviderDescriptor::transient::<Repo>()
                    .depends_on::<Db>()
                    .with_factory(|cx| Ok(Repo { db: cx.get::<Db>()? }))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let err = container.resolve::<Repo>().unwrap_err();
        match err {
            CoreError::DependencyResolutionFailed { service_type, message } => {
                assert!(service_type.contains("Db"));
                assert!(message.contains("connection refused"));
            }
            other => panic!("expected construction failure, got {:?}", other),
        }
    }

    #[test]
    fn test_undeclared_runtime_cycle_is_caught() {
        let mut container = Container::new();
        // The factory pulls its own type without declaring it, bypassing
        // the registration walk; the runtime path guard must catch it.
        container
            .register(
                ProviderDescriptor::transient::<Counter>()
                    .with_factory(|cx| {
                        let _ = cx.get::<Counter>()?;
                        Ok(Counter::new())
                    })
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let err = container.resolve::<Counter>().unwrap_err();
        match err {
            CoreError::DependencyResolutionFailed { message, .. } => {
                assert!(message.contains("Circular dependency"));
            }
            other => panic!("expected wrapped cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_concurrent_first_resolution_constructs_once() {
        static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

        let mut container = Container::new();
        container
            .register(
                ProviderDescriptor::singleton::<Counter>()
                    .with_factory(|_| {
                        CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
                        Ok(Counter::new())
                    })
                    .build()
                    .unwrap(),
            )
            .unwrap();

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| container.resolve::<Counter>().unwrap());
            }
        });

        assert_eq!(CONSTRUCTIONS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nested_request_scoped_dependencies_share_one_cache() {
        struct Session {
            id: uuid::Uuid,
        }
        struct Handler {
            session: Arc<Session>,
        }

        let mut container = Container::new();
        container
            .register(
                ProviderDescriptor::request_scoped::<Session>()
                    .with_factory(|cx| {
                        // Ambient request handle supplied directly
                        let scope = cx.request_scope().expect("scope propagated");
                        Ok(Session {
                            id: scope.scope_id(),
                        })
                    })
                    .build()
                    .unwrap(),
            )
            .unwrap();
        container
            .register(
                ProviderDescriptor::transient::<Handler>()
                    .depends_on::<Session>()
                    .with_factory(|cx| {
                        Ok(Handler {
                            session: cx.get::<Session>()?,
                        })
                    })
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let scope = RequestScope::new();
        let handler = container.resolve_scoped::<Handler>(&scope).unwrap();
        let session = container.resolve_scoped::<Session>(&scope).unwrap();

        assert!(Arc::ptr_eq(&handler.session, &session));
        assert_eq!(session.id, scope.scope_id());
    }
}
