//! # ignis-core
//!
//! Dependency injection and lifecycle orchestration core for the ignis
//! framework.
//!
//! The crate provides:
//! - A typed, explicit [`Container`](container::Container) with singleton,
//!   transient, and request-scoped providers
//! - Registration-time circular dependency validation and runtime
//!   resolution-path guarding
//! - A four-phase [`LifecycleManager`](lifecycle::LifecycleManager) driving
//!   module and provider hooks
//! - A [`ModuleRegistry`](modules::ModuleRegistry) wiring module-provided
//!   services into the container
//!
//! ## Quick start
//!
//! ```rust
//! use ignis_core::container::{Container, ProviderDescriptor};
//!
//! #[derive(Debug)]
//! struct Greeter {
//!     greeting: String,
//! }
//!
//! let mut container = Container::new();
//! container
//!     .register(
//!         ProviderDescriptor::singleton::<Greeter>()
//!             .with_factory(|_| {
//!                 Ok(Greeter {
//!                     greeting: "hello".to_string(),
//!                 })
//!             })
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! let greeter = container.resolve::<Greeter>().unwrap();
//! assert_eq!(greeter.greeting, "hello");
//! ```

pub mod container;
pub mod errors;
pub mod lifecycle;
pub mod modules;

pub use container::{
    Container, Injector, ProviderBuilder, ProviderDescriptor, RequestScope, ServiceId,
    ServiceScope,
};
pub use errors::CoreError;
pub use lifecycle::{LifecycleHook, LifecycleManager, LifecycleState, Module};
pub use modules::ModuleRegistry;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
