use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Coarse lifecycle state persisted for tasks, applications and stacks.
///
/// Stored as a stable integer code.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplicationState {
    #[default]
    Idle,
    Staging,
    Running,
    Fail,
}

impl ApplicationState {
    /// Integer code used by state storages.
    pub const fn code(&self) -> i32 {
        match self {
            ApplicationState::Idle => 0,
            ApplicationState::Staging => 1,
            ApplicationState::Running => 2,
            ApplicationState::Fail => 3,
        }
    }
}

impl TryFrom<i32> for ApplicationState {
    type Error = ModelError;
    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ApplicationState::Idle),
            1 => Ok(ApplicationState::Staging),
            2 => Ok(ApplicationState::Running),
            3 => Ok(ApplicationState::Fail),
            other => Err(ModelError::UnknownApplicationState(other)),
        }
    }
}

impl fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApplicationState::Idle => "idle",
            ApplicationState::Staging => "staging",
            ApplicationState::Running => "running",
            ApplicationState::Fail => "fail",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        for (state, code) in [
            (ApplicationState::Idle, 0),
            (ApplicationState::Staging, 1),
            (ApplicationState::Running, 2),
            (ApplicationState::Fail, 3),
        ] {
            assert_eq!(state.code(), code);
            assert_eq!(ApplicationState::try_from(code).unwrap(), state);
        }
        assert!(ApplicationState::try_from(42).is_err());
    }
}
