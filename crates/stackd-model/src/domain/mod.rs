mod attributes;
pub use attributes::Attributes;

mod constants;
pub use constants::{ATTRIBUTE_HOSTNAME, RESOURCE_CPUS, RESOURCE_MEM, TASK_ID_DELIMITER};

/// Identifier of a staged application.
///
/// Must not contain [`TASK_ID_DELIMITER`]: it is the first field of every task id.
pub type ApplicationId = String;

/// Hostname of the agent an offer was made for.
pub type Hostname = String;
