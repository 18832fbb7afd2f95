use stackd_model::{Attributes, TaskId, TaskState};

/// Runtime record of one launched instance.
///
/// Created on launch and never removed; only `state` changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRecord {
    pub task_id: TaskId,
    pub state: TaskState,
    /// Attributes of the host the task was launched on.
    pub attributes: Attributes,
}

impl TaskRecord {
    /// Fresh record in `Staging`.
    pub fn staging(task_id: TaskId, attributes: Attributes) -> Self {
        Self {
            task_id,
            state: TaskState::Staging,
            attributes,
        }
    }

    /// Value of `attribute` on the task's host; absent reads as empty.
    pub fn attribute(&self, attribute: &str) -> &str {
        self.attributes.get(attribute).unwrap_or("")
    }
}
