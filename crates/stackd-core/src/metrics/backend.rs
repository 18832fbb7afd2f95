use std::sync::Arc;

/// Terminal outcome of a staged application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every instance finished.
    Success,
    /// A task was lost, failed or errored.
    Failure,
}

impl RunOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            RunOutcome::Success => "success",
            RunOutcome::Failure => "failure",
        }
    }
}

/// Backend metrics collection interface.
///
/// Every method is called with the runner lock held, so implementations must not block.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record a task accepted by the launch driver.
    ///
    /// # Arguments
    /// - `app_type`: Application type
    fn record_task_launched(&self, app_type: &str);
    /// Record an offer the scheduler did not use.
    ///
    /// # Arguments
    /// - `reason`: Decline reason label (see `DeclineReason::as_label`)
    fn record_offer_declined(&self, reason: &str);
    /// Record a launch the driver rejected.
    ///
    /// # Arguments
    /// - `app_type`: Application type
    /// - `error_kind`: Error category
    fn record_launch_error(&self, app_type: &str, error_kind: &str);
    /// Record the terminal result of an application.
    ///
    /// # Arguments
    /// - `app_type`: Application type
    /// - `outcome`: How the application terminated
    /// - `duration_ms`: Time from staging to the terminal result
    fn record_application_completed(&self, app_type: &str, outcome: RunOutcome, duration_ms: u64);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
