//! Per-application runtime of a run-once workload.
//!
//! An [`ApplicationContext`] owns the remaining-instance counter, the task
//! records, the offer-matching rules and the task state machine of one
//! staged application. It publishes exactly one [`ApplicationRunStatus`].
mod decline;
pub use decline::DeclineReason;

mod record;
pub use record::TaskRecord;

mod constraint;

mod id;
pub use id::new_task_id;

mod result;
pub use result::{ResultReceiver, ResultSender, result_channel};

mod context;
pub use context::ApplicationContext;
