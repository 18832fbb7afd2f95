use crate::metrics::backend::{MetricsBackend, RunOutcome};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_task_launched(&self, _: &str) {}

    #[inline(always)]
    fn record_offer_declined(&self, _: &str) {}

    #[inline(always)]
    fn record_launch_error(&self, _: &str, _: &str) {}

    #[inline(always)]
    fn record_application_completed(&self, _: &str, _: RunOutcome, _: u64) {}
}
