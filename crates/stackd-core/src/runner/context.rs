use std::fmt;

use stackd_state::{StateHandle, noop_storage};

use crate::metrics::{MetricsHandle, noop_metrics};

/// Collaborators shared by everything a runner does.
#[derive(Clone)]
pub struct RunnerContext {
    storage: StateHandle,
    metrics: MetricsHandle,
}

impl RunnerContext {
    pub fn new(storage: StateHandle, metrics: MetricsHandle) -> Self {
        Self { storage, metrics }
    }

    /// Lifecycle state sink.
    pub fn storage(&self) -> &StateHandle {
        &self.storage
    }

    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    /// Replace the state storage and return the updated context.
    pub fn with_storage(mut self, storage: StateHandle) -> Self {
        self.storage = storage;
        self
    }

    /// Replace the metrics backend and return the updated context.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }
}

impl Default for RunnerContext {
    fn default() -> Self {
        Self {
            storage: noop_storage(),
            metrics: noop_metrics(),
        }
    }
}

impl fmt::Debug for RunnerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerContext")
            .field("storage", &"<handle>")
            .field("metrics", &"<handle>")
            .finish()
    }
}
