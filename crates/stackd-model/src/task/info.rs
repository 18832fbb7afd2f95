use serde::{Deserialize, Serialize};

use crate::{Hostname, Resource, TaskId};

/// Command run by a launched task.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandInfo {
    /// Command line.
    pub value: String,
    /// Run `value` through the host shell.
    pub shell: bool,
    /// URIs fetched before the command starts, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uris: Vec<String>,
}

impl CommandInfo {
    /// Shell command with artifact URIs.
    pub fn shell(value: impl Into<String>, uris: Vec<String>) -> Self {
        Self {
            value: value.into(),
            shell: true,
            uris,
        }
    }
}

/// Launch request handed to the resource manager for one offer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub task_id: TaskId,
    /// Human-readable name, `<application>.<hostname>`.
    pub name: String,
    /// Offer the task consumes.
    pub offer_id: String,
    /// Agent the task runs on.
    pub hostname: Hostname,
    pub command: CommandInfo,
    /// Resources reserved for the task.
    pub resources: Vec<Resource>,
}

impl TaskInfo {
    /// Display name for a task of `application_id` on `hostname`.
    pub fn task_name(application_id: &str, hostname: &str) -> String {
        format!("{application_id}.{hostname}")
    }

    /// Reserved CPU shares (sum of `cpus` resources).
    pub fn cpus(&self) -> f64 {
        self.resources
            .iter()
            .filter(|r| r.name == crate::RESOURCE_CPUS)
            .map(|r| r.value)
            .sum()
    }

    /// Reserved memory (sum of `mem` resources).
    pub fn mem(&self) -> f64 {
        self.resources
            .iter()
            .filter(|r| r.name == crate::RESOURCE_MEM)
            .map(|r| r.value)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_name_joins_with_dot() {
        assert_eq!(TaskInfo::task_name("foo", "slave0"), "foo.slave0");
    }

    #[test]
    fn reserved_resources() {
        let info = TaskInfo {
            task_id: TaskId::new("foo", "slave0", "x").unwrap(),
            name: TaskInfo::task_name("foo", "slave0"),
            offer_id: "o1".into(),
            hostname: "slave0".into(),
            command: CommandInfo::shell("sleep 10", vec!["http://a/b.tgz".into()]),
            resources: vec![Resource::cpus(0.2), Resource::mem(256.0)],
        };
        assert_eq!(info.cpus(), 0.2);
        assert_eq!(info.mem(), 256.0);
        assert!(info.command.shell);
        assert_eq!(info.command.uris, vec!["http://a/b.tgz".to_string()]);
    }
}
