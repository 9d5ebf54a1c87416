/// Application lifecycle phases.
///
/// The application moves through these states in order:
/// `NotStarted -> ModuleInit -> AppBootstrap -> Running -> AppShutdown -> ModuleDestroy`.
/// The state is monotonically non-decreasing; a transition to an earlier
/// phase is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    /// The application has not yet started
    NotStarted,
    /// Module initialization hooks are running (or ran last)
    ModuleInit,
    /// Application bootstrap hooks are running
    AppBootstrap,
    /// The application is ready to handle work
    Running,
    /// Shutdown hooks are running; no new work should be accepted
    AppShutdown,
    /// Module destroy hooks are running; final resource cleanup
    ModuleDestroy,
}

impl LifecycleState {
    /// Get the state name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::NotStarted => "not-started",
            LifecycleState::ModuleInit => "module-init",
            LifecycleState::AppBootstrap => "app-bootstrap",
            LifecycleState::Running => "running",
            LifecycleState::AppShutdown => "app-shutdown",
            LifecycleState::ModuleDestroy => "module-destroy",
        }
    }
}

impl Default for LifecycleState {
    fn default() -> Self {
        LifecycleState::NotStarted
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
