mod domain;
pub use domain::{ATTRIBUTE_HOSTNAME, RESOURCE_CPUS, RESOURCE_MEM, TASK_ID_DELIMITER};
pub use domain::{ApplicationId, Attributes, Hostname};

mod error;
pub use error::{ModelError, ModelResult};

mod spec;
pub use spec::{Application, Constraint, ConstraintOperator};

mod offer;
pub use offer::{Offer, Resource};

mod status;
pub use status::{ApplicationRunStatus, ApplicationState, RunFailure, TaskState, TaskStatus};

mod task;
pub use task::{CommandInfo, TaskId, TaskInfo};
