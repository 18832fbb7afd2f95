use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use stackd_model::ApplicationState;

use crate::{StateError, StateResult};

/// String key/value properties (task keys and task context).
pub type Props = BTreeMap<String, String>;

/// What a [`StateRecord`] describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Task,
    Application,
    Stack,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Task => "task",
            RecordKind::Application => "application",
            RecordKind::Stack => "stack",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted lifecycle row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    pub id: String,
    pub kind: RecordKind,
    /// Owning stack for applications; empty otherwise.
    #[serde(default)]
    pub parent: String,
    /// [`ApplicationState::code`].
    pub state: i32,
    /// JSON-encoded task context; empty for applications and stacks.
    #[serde(default)]
    pub props: String,
}

impl StateRecord {
    /// Task row keyed by `task["id"]`, with `context` stored as JSON props.
    pub fn task(task: &Props, context: &Props, state: ApplicationState) -> StateResult<Self> {
        let id = task.get("id").ok_or(StateError::MissingKey("id"))?;
        let props = serde_json::to_string(context).map_err(|e| StateError::Serialize(e.to_string()))?;
        Ok(Self {
            id: id.clone(),
            kind: RecordKind::Task,
            parent: String::new(),
            state: state.code(),
            props,
        })
    }

    pub fn application(id: &str, parent: &str, state: ApplicationState) -> Self {
        Self {
            id: id.to_string(),
            kind: RecordKind::Application,
            parent: parent.to_string(),
            state: state.code(),
            props: String::new(),
        }
    }

    pub fn stack(id: &str, state: ApplicationState) -> Self {
        Self {
            id: id.to_string(),
            kind: RecordKind::Stack,
            parent: String::new(),
            state: state.code(),
            props: String::new(),
        }
    }

    /// Storage key: `<kind>/<id>`. Later writes for the same key replace earlier ones.
    pub fn key(&self) -> String {
        format!("{}/{}", self.kind, self.id)
    }

    pub fn application_state(&self) -> StateResult<ApplicationState> {
        ApplicationState::try_from(self.state).map_err(|e| StateError::Deserialize(e.to_string()))
    }

    /// Decode the task context stored in `props`.
    pub fn context(&self) -> StateResult<Props> {
        if self.props.is_empty() {
            return Ok(Props::new());
        }
        serde_json::from_str(&self.props).map_err(|e| StateError::Deserialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_record_requires_id() {
        let err = StateRecord::task(&Props::new(), &Props::new(), ApplicationState::Running)
            .unwrap_err();
        assert!(matches!(err, StateError::MissingKey("id")));
    }

    #[test]
    fn task_record_encodes_context() {
        let task = Props::from([("id".to_string(), "foo|slave0|x".to_string())]);
        let ctx = Props::from([("hostname".to_string(), "slave0".to_string())]);
        let rec = StateRecord::task(&task, &ctx, ApplicationState::Running).unwrap();

        assert_eq!(rec.key(), "task/foo|slave0|x");
        assert_eq!(rec.state, 2);
        assert_eq!(rec.context().unwrap(), ctx);
        assert_eq!(rec.application_state().unwrap(), ApplicationState::Running);
    }

    #[test]
    fn application_record_keeps_parent() {
        let rec = StateRecord::application("foo", "stack-1", ApplicationState::Staging);
        assert_eq!(rec.key(), "application/foo");
        assert_eq!(rec.parent, "stack-1");
        assert!(rec.context().unwrap().is_empty());
    }
}
