//! Module registration and container wiring.

pub mod registry;

pub use registry::ModuleRegistry;
