//! Application lifecycle orchestration.
//!
//! Four ordered hook phases — module init, application bootstrap,
//! application shutdown, module destroy — dispatched over registered
//! modules and providers by [`LifecycleManager`].

pub mod hooks;
pub mod manager;
pub mod state;

pub use hooks::{LifecycleHook, Module};
pub use manager::{LifecycleManager, ShutdownHook};
pub use state::LifecycleState;
