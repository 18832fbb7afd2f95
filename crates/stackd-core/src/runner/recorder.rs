use stackd_model::{Application, ApplicationState, TaskId, TaskState};
use stackd_state::Props;
use tracing::warn;

use super::RunnerContext;
use crate::application::TaskRecord;

/// Lifecycle state persisted for a task in `state`, if any.
pub(crate) fn lifecycle_state(state: TaskState) -> Option<ApplicationState> {
    if !state.is_tracked() {
        return None;
    }
    match state {
        TaskState::Staging => Some(ApplicationState::Staging),
        TaskState::Running => Some(ApplicationState::Running),
        TaskState::Finished => Some(ApplicationState::Idle),
        _ => Some(ApplicationState::Fail),
    }
}

/// Key map identifying a task in the state store.
fn task_key(task_id: &TaskId) -> Props {
    Props::from([
        ("id".to_string(), task_id.to_string()),
        ("application".to_string(), task_id.application_id().to_string()),
        ("hostname".to_string(), task_id.hostname().to_string()),
    ])
}

pub(crate) fn record_task(ctx: &RunnerContext, task_id: &TaskId, record: Option<&TaskRecord>, state: ApplicationState) {
    let context: Props = record
        .map(|r| r.attributes.0.clone())
        .unwrap_or_default();
    if let Err(e) = ctx
        .storage()
        .save_task_state(&task_key(task_id), &context, state)
    {
        warn!(task = %task_id, %state, error = %e, "failed to record task state");
    }
}

pub(crate) fn record_application(ctx: &RunnerContext, app: &Application, state: ApplicationState) {
    let parent = app.parent.as_deref().unwrap_or_default();
    if let Err(e) = ctx
        .storage()
        .save_application_state(&app.id, parent, state)
    {
        warn!(app = %app.id, %state, error = %e, "failed to record application state");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_mapping() {
        assert_eq!(lifecycle_state(TaskState::Staging), Some(ApplicationState::Staging));
        assert_eq!(lifecycle_state(TaskState::Running), Some(ApplicationState::Running));
        assert_eq!(lifecycle_state(TaskState::Finished), Some(ApplicationState::Idle));
        assert_eq!(lifecycle_state(TaskState::Lost), Some(ApplicationState::Fail));
        assert_eq!(lifecycle_state(TaskState::Error), Some(ApplicationState::Fail));
        for ignored in [TaskState::Starting, TaskState::Killing, TaskState::Killed] {
            assert_eq!(lifecycle_state(ignored), None);
        }
    }

    #[test]
    fn task_key_carries_id_parts() {
        let id: TaskId = "foo|slave0|x".parse().unwrap();
        let key = task_key(&id);
        assert_eq!(key["id"], "foo|slave0|x");
        assert_eq!(key["application"], "foo");
        assert_eq!(key["hostname"], "slave0");
    }
}
