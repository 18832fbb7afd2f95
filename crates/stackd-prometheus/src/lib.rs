//! Prometheus metrics backend for the run-once scheduler.
//!
//! [`PrometheusMetrics`] implements [`stackd_core::MetricsBackend`] and also
//! publishes resource usage of the scheduler process itself.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use stackd_core::prelude::*;
//! use stackd_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let runner = RunOnceRunner::new()
//!     .with_context(RunnerContext::default().with_metrics(Arc::new(metrics.clone())));
//!
//! metrics.observe_process();
//! let families = metrics.gather();
//! # let _ = (runner, families);
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `stackd_tasks_launched_total{app_type}` - Counter
//! - `stackd_offers_declined_total{reason}` - Counter
//! - `stackd_launch_errors_total{app_type, error_kind}` - Counter
//! - `stackd_applications_completed_total{app_type, outcome}` - Counter
//! - `stackd_application_duration_seconds{app_type}` - Histogram
//! - `stackd_process_*` - Gauges, see [`ProcessSnapshot`]
mod backend;
pub use backend::PrometheusMetrics;

mod process;
pub use process::ProcessSnapshot;

pub use prometheus::{Encoder, Registry, TextEncoder};
