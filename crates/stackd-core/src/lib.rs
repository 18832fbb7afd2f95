pub mod application;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod runner;

pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, RunOutcome, noop_metrics};

pub mod prelude {
    pub use crate::application::{
        ApplicationContext, DeclineReason, ResultReceiver, TaskRecord,
    };
    pub use crate::driver::{DriverError, LaunchDriver, RecordingDriver};
    pub use crate::error::CoreError;
    pub use crate::runner::{OfferOutcome, RunOnceRunner, RunnerContext};
}
