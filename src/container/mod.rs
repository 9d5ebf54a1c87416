#[allow(clippy::module_inception)]
pub mod container;
pub mod descriptor;
pub mod resolver;
pub mod scope;

pub use container::{Container, Injector};
pub use descriptor::{ProviderBuilder, ProviderDescriptor, ProviderFactory, ServiceId};
pub use resolver::{CycleValidator, ResolutionPath};
pub use scope::{RequestScope, ServiceScope};
