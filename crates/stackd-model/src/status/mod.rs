mod task_state;
pub use task_state::TaskState;

mod task_status;
pub use task_status::TaskStatus;

mod run;
pub use run::{ApplicationRunStatus, RunFailure};

mod application_state;
pub use application_state::ApplicationState;
