use std::{collections::BTreeMap, sync::Arc};

use stackd_model::ApplicationState;

use crate::{NoopStateStorage, Props, StateResult};

/// Sink for lifecycle transitions.
///
/// Implementations must be safe to call from any thread. Callers in the
/// scheduling path treat every error as non-fatal.
pub trait StateStorage: Send + Sync {
    /// Record a task transition. `task` must carry an `id` entry; `context`
    /// is stored verbatim as the task's properties.
    fn save_task_state(&self, task: &Props, context: &Props, state: ApplicationState) -> StateResult<()>;

    /// Record an application transition under its owning stack.
    fn save_application_state(&self, id: &str, parent: &str, state: ApplicationState) -> StateResult<()>;

    fn save_stack_state(&self, id: &str, state: ApplicationState) -> StateResult<()>;

    /// Latest state of every application whose parent is `stack_id`.
    fn get_stack_state(&self, stack_id: &str) -> StateResult<BTreeMap<String, ApplicationState>>;
}

/// Shared storage handle.
pub type StateHandle = Arc<dyn StateStorage>;

/// Storage that records nothing.
pub fn noop_storage() -> StateHandle {
    Arc::new(NoopStateStorage)
}
