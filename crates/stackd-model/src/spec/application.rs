use serde::{Deserialize, Serialize};

use crate::{
    Constraint,
    domain::{ApplicationId, TASK_ID_DELIMITER},
    error::{ModelError, ModelResult},
};

/// Desired state of a run-once application.
///
/// An application is a fixed number of identical instances that each run
/// `launch_command` to completion. It is immutable once staged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Unique application identifier; first field of every task id.
    pub id: ApplicationId,
    /// Free-form application type (used as a metrics label).
    #[serde(rename = "type", default)]
    pub app_type: String,
    /// Owning stack, if any. Only used when recording lifecycle state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// CPU shares reserved per instance.
    pub cpu: f64,
    /// Memory (MB) reserved per instance.
    pub mem: f64,
    /// Requested instance count, as supplied by the caller (textual).
    pub instances: String,
    /// Shell command executed on the target host.
    pub launch_command: String,
    /// URIs fetched onto the host before the command runs, in order.
    #[serde(default, rename = "artifactURLs", skip_serializing_if = "Vec::is_empty")]
    pub artifact_urls: Vec<String>,
    /// Placement constraints applied to every instance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

impl Application {
    /// Parse the textual instance count.
    pub fn instance_count(&self) -> ModelResult<u32> {
        self.instances
            .trim()
            .parse::<u32>()
            .map_err(|_| ModelError::InvalidInstances {
                id: self.id.clone(),
                value: self.instances.clone(),
            })
    }

    /// Attach a placement constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Check the application can be staged.
    ///
    /// Rules:
    /// - `id` is not empty and does not contain the task-id delimiter;
    /// - `cpu` and `mem` are finite and not negative;
    /// - `instances` parses as a non-negative integer.
    pub fn validate(&self) -> ModelResult<()> {
        if self.id.trim().is_empty() {
            return Err(ModelError::Invalid("application id is empty".into()));
        }
        if self.id.contains(TASK_ID_DELIMITER) {
            return Err(ModelError::ReservedDelimiter {
                field: "application id",
                value: self.id.clone(),
            });
        }
        for (name, value) in [("cpu", self.cpu), ("mem", self.mem)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::Invalid(format!(
                    "application '{}' has invalid {name}: {value}",
                    self.id
                )));
            }
        }
        self.instance_count().map(|_| ())
    }
}
