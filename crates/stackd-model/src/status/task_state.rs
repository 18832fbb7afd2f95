use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Lifecycle state of a launched task as reported by the resource manager.
///
/// Only `Staging`, `Running`, `Finished`, `Failed`, `Lost` and `Error` drive
/// the run-once state machine; the remaining states are accepted on the wire
/// but carry no transition and are ignored by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskState {
    #[serde(rename = "TASK_STAGING")]
    Staging,
    #[serde(rename = "TASK_STARTING")]
    Starting,
    #[serde(rename = "TASK_RUNNING")]
    Running,
    #[serde(rename = "TASK_KILLING")]
    Killing,
    #[serde(rename = "TASK_FINISHED")]
    Finished,
    #[serde(rename = "TASK_FAILED")]
    Failed,
    #[serde(rename = "TASK_KILLED")]
    Killed,
    #[serde(rename = "TASK_LOST")]
    Lost,
    #[serde(rename = "TASK_ERROR")]
    Error,
}

impl TaskState {
    /// Wire name of the state (e.g. `TASK_LOST`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Staging => "TASK_STAGING",
            TaskState::Starting => "TASK_STARTING",
            TaskState::Running => "TASK_RUNNING",
            TaskState::Killing => "TASK_KILLING",
            TaskState::Finished => "TASK_FINISHED",
            TaskState::Failed => "TASK_FAILED",
            TaskState::Killed => "TASK_KILLED",
            TaskState::Lost => "TASK_LOST",
            TaskState::Error => "TASK_ERROR",
        }
    }

    /// `Lost`, `Failed` and `Error` fail the whole application.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskState::Lost | TaskState::Failed | TaskState::Error)
    }

    /// States the run-once state machine has a transition for.
    #[inline]
    pub fn is_tracked(&self) -> bool {
        matches!(
            self,
            TaskState::Staging | TaskState::Running | TaskState::Finished
        ) || self.is_failure()
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskState {
    type Err = ModelError;

    /// Accepts wire names (`TASK_LOST`) and short names (`lost`), case-insensitive.
    fn from_str(s: &str) -> ModelResult<Self> {
        let norm = s.trim().to_ascii_lowercase();
        let short = norm.strip_prefix("task_").unwrap_or(&norm);
        match short {
            "staging" => Ok(TaskState::Staging),
            "starting" => Ok(TaskState::Starting),
            "running" => Ok(TaskState::Running),
            "killing" => Ok(TaskState::Killing),
            "finished" => Ok(TaskState::Finished),
            "failed" => Ok(TaskState::Failed),
            "killed" => Ok(TaskState::Killed),
            "lost" => Ok(TaskState::Lost),
            "error" => Ok(TaskState::Error),
            _ => Err(ModelError::UnknownTaskState(s.to_string())),
        }
    }
}
