use serde::{Deserialize, Serialize};

use crate::{TaskId, TaskState, error::ModelResult};

/// Asynchronous status notification for one task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub task_id: TaskId,
    pub state: TaskState,
    /// Optional human-readable detail supplied by the resource manager.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TaskStatus {
    pub fn new(task_id: TaskId, state: TaskState) -> Self {
        Self {
            task_id,
            state,
            message: None,
        }
    }

    /// Build a status from a raw task id string.
    ///
    /// Fails if the id is not exactly three `|`-delimited fields.
    pub fn parse(task_id: &str, state: TaskState) -> ModelResult<Self> {
        Ok(Self::new(task_id.parse()?, state))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
