use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    TASK_ID_DELIMITER,
    error::{ModelError, ModelResult},
};

/// Identifier of a launched task: `<application>|<hostname>|<instance>`.
///
/// The owning application id and the host are recovered from the id alone,
/// so none of the three fields may contain `|`. A `TaskId` that exists has
/// exactly three fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId {
    raw: String,
    /// Byte offsets of the two delimiters in `raw`.
    first: usize,
    second: usize,
}

impl TaskId {
    /// Compose an id from its parts.
    pub fn new(application_id: &str, hostname: &str, instance: &str) -> ModelResult<Self> {
        for (field, value) in [
            ("application id", application_id),
            ("hostname", hostname),
            ("instance", instance),
        ] {
            if value.contains(TASK_ID_DELIMITER) {
                return Err(ModelError::ReservedDelimiter {
                    field,
                    value: value.to_string(),
                });
            }
        }
        let raw = format!(
            "{application_id}{d}{hostname}{d}{instance}",
            d = TASK_ID_DELIMITER
        );
        let first = application_id.len();
        let second = first + 1 + hostname.len();
        Ok(Self { raw, first, second })
    }

    /// Parse a raw id; it must split into exactly three fields.
    pub fn parse(raw: impl Into<String>) -> ModelResult<Self> {
        let raw = raw.into();
        let mut positions = raw.match_indices(TASK_ID_DELIMITER).map(|(i, _)| i);
        match (positions.next(), positions.next(), positions.next()) {
            (Some(first), Some(second), None) => Ok(Self { raw, first, second }),
            _ => Err(ModelError::InvalidTaskId(raw)),
        }
    }

    /// Owning application id (first field).
    pub fn application_id(&self) -> &str {
        &self.raw[..self.first]
    }

    /// Host the task was launched on (second field).
    pub fn hostname(&self) -> &str {
        &self.raw[self.first + 1..self.second]
    }

    /// Per-launch unique suffix (third field).
    pub fn instance(&self) -> &str {
        &self.raw[self.second + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl FromStr for TaskId {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TaskId {
    type Error = ModelError;
    fn try_from(value: String) -> ModelResult<Self> {
        Self::parse(value)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_accessors() {
        let id = TaskId::new("foo", "slave0", "asd-asd").unwrap();
        assert_eq!(id.as_str(), "foo|slave0|asd-asd");
        assert_eq!(id.application_id(), "foo");
        assert_eq!(id.hostname(), "slave0");
        assert_eq!(id.instance(), "asd-asd");
    }

    #[test]
    fn new_rejects_delimiter_in_any_field() {
        assert!(matches!(
            TaskId::new("f|oo", "slave0", "x"),
            Err(ModelError::ReservedDelimiter { field: "application id", .. })
        ));
        assert!(matches!(
            TaskId::new("foo", "sla|ve0", "x"),
            Err(ModelError::ReservedDelimiter { field: "hostname", .. })
        ));
        assert!(TaskId::new("foo", "slave0", "x|y").is_err());
    }

    #[test]
    fn parse_requires_exactly_three_fields() {
        assert!("foo|slave0".parse::<TaskId>().is_err());
        assert!("foo|slave0|a|b".parse::<TaskId>().is_err());
        assert!("foo".parse::<TaskId>().is_err());

        let id: TaskId = "foo|slave0|abc".parse().unwrap();
        assert_eq!(id.hostname(), "slave0");
    }

    #[test]
    fn empty_fields_are_preserved() {
        let id: TaskId = "||".parse().unwrap();
        assert_eq!(id.application_id(), "");
        assert_eq!(id.hostname(), "");
        assert_eq!(id.instance(), "");
    }

    #[test]
    fn parse_matches_new() {
        let built = TaskId::new("app", "host-1.local", "u-1").unwrap();
        let parsed: TaskId = built.to_string().parse().unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn serde_is_a_plain_string() {
        let id = TaskId::new("foo", "slave0", "x").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""foo|slave0|x""#);
        assert!(serde_json::from_str::<TaskId>(r#""foo|slave0""#).is_err());
    }
}
