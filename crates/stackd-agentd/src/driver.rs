use std::{
    collections::BTreeSet,
    mem,
    sync::{Mutex, PoisonError},
};

use tracing::{debug, info};

use stackd_core::prelude::{DriverError, LaunchDriver};
use stackd_model::{TaskId, TaskInfo, TaskState, TaskStatus};

/// In-process stand-in for the resource manager.
///
/// Accepted tasks are queued; every [`SimulatedDriver::drain`] reports them
/// as running and then finished, or failed when their host is marked failing.
#[derive(Debug, Default)]
pub struct SimulatedDriver {
    failing_hosts: BTreeSet<String>,
    pending: Mutex<Vec<TaskId>>,
}

impl SimulatedDriver {
    pub fn new(failing_hosts: impl IntoIterator<Item = String>) -> Self {
        Self {
            failing_hosts: failing_hosts.into_iter().collect(),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Take queued tasks and produce their status updates in delivery order.
    pub fn drain(&self) -> Vec<TaskStatus> {
        let pending = mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner));

        let mut updates = Vec::with_capacity(pending.len() * 2);
        for id in pending {
            updates.push(TaskStatus::new(id.clone(), TaskState::Running));
            let terminal = if self.failing_hosts.contains(id.hostname()) {
                TaskStatus::new(id, TaskState::Failed).with_message("exit status 1")
            } else {
                TaskStatus::new(id, TaskState::Finished)
            };
            updates.push(terminal);
        }
        updates
    }
}

impl LaunchDriver for SimulatedDriver {
    fn launch_tasks(&self, offer_id: &str, tasks: Vec<TaskInfo>) -> Result<(), DriverError> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        for task in tasks {
            info!(offer = offer_id, task = %task.task_id, command = %task.command.value, "task accepted");
            pending.push(task.task_id);
        }
        Ok(())
    }

    fn decline_offer(&self, offer_id: &str, reason: &str) -> Result<(), DriverError> {
        debug!(offer = offer_id, reason, "offer declined");
        Ok(())
    }
}
