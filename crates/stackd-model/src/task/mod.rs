mod id;
pub use id::TaskId;

mod info;
pub use info::{CommandInfo, TaskInfo};
