use std::sync::Arc;

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, proto::MetricFamily,
};
use tracing::warn;

use stackd_core::{MetricsBackend, RunOutcome};

use crate::ProcessSnapshot;

const NAMESPACE: &str = "stackd";

/// Gauges fed from [`ProcessSnapshot`].
#[derive(Clone)]
struct ProcessGauges {
    cpu_user: Gauge,
    cpu_system: Gauge,
    max_rss: Gauge,
    resident: Gauge,
    virtual_mem: Gauge,
    threads: Gauge,
    open_fds: Gauge,
}

impl ProcessGauges {
    fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let gauge = |name: &str, help: &str| -> Result<Gauge, prometheus::Error> {
            let g = Gauge::with_opts(Opts::new(name, help).namespace(NAMESPACE))?;
            registry.register(Box::new(g.clone()))?;
            Ok(g)
        };
        Ok(Self {
            cpu_user: gauge("process_cpu_user_seconds", "User CPU time of the scheduler process")?,
            cpu_system: gauge("process_cpu_system_seconds", "System CPU time of the scheduler process")?,
            max_rss: gauge("process_max_resident_bytes", "Peak resident set size")?,
            resident: gauge("process_resident_bytes", "Current resident set size")?,
            virtual_mem: gauge("process_virtual_bytes", "Virtual memory size")?,
            threads: gauge("process_threads", "Number of OS threads")?,
            open_fds: gauge("process_open_fds", "Number of open file descriptors")?,
        })
    }

    fn set(&self, snap: &ProcessSnapshot) {
        self.cpu_user.set(snap.user_cpu_seconds);
        self.cpu_system.set(snap.system_cpu_seconds);
        self.max_rss.set(snap.max_rss_bytes as f64);
        if let Some(v) = snap.resident_bytes {
            self.resident.set(v as f64);
        }
        if let Some(v) = snap.virtual_bytes {
            self.virtual_mem.set(v as f64);
        }
        if let Some(v) = snap.threads {
            self.threads.set(v as f64);
        }
        if let Some(v) = snap.open_fds {
            self.open_fds.set(v as f64);
        }
    }
}

/// Prometheus metrics backend for the run-once scheduler.
///
/// ## Label cardinality
/// - `app_type`: application types configured by the operator
/// - `reason`: see `DeclineReason::as_label`
/// - `outcome`: "success", "failure"
/// - `error_kind`: see `DriverError::as_label`
#[derive(Clone)]
pub struct PrometheusMetrics {
    tasks_launched: CounterVec,
    offers_declined: CounterVec,
    launch_errors: CounterVec,
    applications_completed: CounterVec,
    application_duration: HistogramVec,
    process: ProcessGauges,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Register all metrics in `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let tasks_launched = CounterVec::new(
            Opts::new("tasks_launched_total", "Tasks accepted by the launch driver").namespace(NAMESPACE),
            &["app_type"],
        )?;
        registry.register(Box::new(tasks_launched.clone()))?;

        let offers_declined = CounterVec::new(
            Opts::new("offers_declined_total", "Offers not used by any application").namespace(NAMESPACE),
            &["reason"],
        )?;
        registry.register(Box::new(offers_declined.clone()))?;

        let launch_errors = CounterVec::new(
            Opts::new("launch_errors_total", "Task submissions rejected by the launch driver")
                .namespace(NAMESPACE),
            &["app_type", "error_kind"],
        )?;
        registry.register(Box::new(launch_errors.clone()))?;

        let applications_completed = CounterVec::new(
            Opts::new("applications_completed_total", "Applications that published a result")
                .namespace(NAMESPACE),
            &["app_type", "outcome"],
        )?;
        registry.register(Box::new(applications_completed.clone()))?;

        let application_duration = HistogramVec::new(
            HistogramOpts::new(
                "application_duration_seconds",
                "Time from staging to the terminal result",
            )
            .namespace(NAMESPACE)
            .buckets(vec![1.0, 5.0, 15.0, 60.0, 300.0, 900.0, 3600.0, 14400.0]),
            &["app_type"],
        )?;
        registry.register(Box::new(application_duration.clone()))?;

        let process = ProcessGauges::register(&registry)?;

        Ok(Self {
            tasks_launched,
            offers_declined,
            launch_errors,
            applications_completed,
            application_duration,
            process,
            registry,
        })
    }

    /// Backend with a private registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Refresh the `stackd_process_*` gauges.
    pub fn observe_process(&self) {
        match ProcessSnapshot::capture() {
            Ok(snap) => self.process.set(&snap),
            Err(e) => warn!(error = %e, "failed to read process resource usage"),
        }
    }

    /// Gather all metrics for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_task_launched(&self, app_type: &str) {
        self.tasks_launched.with_label_values(&[app_type]).inc();
    }

    fn record_offer_declined(&self, reason: &str) {
        self.offers_declined.with_label_values(&[reason]).inc();
    }

    fn record_launch_error(&self, app_type: &str, error_kind: &str) {
        self.launch_errors
            .with_label_values(&[app_type, error_kind])
            .inc();
    }

    fn record_application_completed(&self, app_type: &str, outcome: RunOutcome, duration_ms: u64) {
        self.applications_completed
            .with_label_values(&[app_type, outcome.as_label()])
            .inc();
        self.application_duration
            .with_label_values(&[app_type])
            .observe(duration_ms as f64 / 1000.0);
    }
}
