use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ApplicationId, Hostname, TaskState};

/// Reason a run-once application failed.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("failed to run on host {hostname}: {state}")]
#[serde(rename_all = "camelCase")]
pub struct RunFailure {
    /// Host the failing task was launched on.
    pub hostname: Hostname,
    /// Terminal state observed for that task.
    pub state: TaskState,
}

/// Single terminal result published for a staged application.
///
/// `error == None` means every instance finished.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRunStatus {
    pub application_id: ApplicationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RunFailure>,
}

impl ApplicationRunStatus {
    pub fn success(application_id: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            error: None,
        }
    }

    pub fn failure(application_id: impl Into<String>, failure: RunFailure) -> Self {
        Self {
            application_id: application_id.into(),
            error: Some(failure),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into a `Result`, dropping the application id.
    pub fn into_result(self) -> Result<(), RunFailure> {
        match self.error {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_names_host_and_state() {
        let failure = RunFailure {
            hostname: "slave0".into(),
            state: TaskState::Lost,
        };
        assert_eq!(failure.to_string(), "failed to run on host slave0: TASK_LOST");

        let status = ApplicationRunStatus::failure("foo", failure.clone());
        assert!(!status.is_success());
        assert_eq!(status.into_result(), Err(failure));
    }

    #[test]
    fn success_has_no_error() {
        let status = ApplicationRunStatus::success("foo");
        assert!(status.is_success());
        assert!(status.into_result().is_ok());
    }
}
