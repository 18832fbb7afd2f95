use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use stackd_model::TaskInfo;

use super::{DriverError, LaunchDriver};

/// Driver that records every call instead of talking to a resource manager.
///
/// Can be switched into a failing mode where every launch is rejected.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    launched: Mutex<Vec<TaskInfo>>,
    launch_calls: Mutex<usize>,
    declined: Mutex<Vec<(String, String)>>,
    fail_launches: AtomicBool,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Driver whose launches are all rejected.
    pub fn failing() -> Self {
        let d = Self::default();
        d.set_failing(true);
        d
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail_launches.store(fail, Ordering::SeqCst);
    }

    /// Number of `launch_tasks` calls, including rejected ones.
    pub fn launch_count(&self) -> usize {
        *self.launch_calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Tasks accepted so far, in submission order.
    pub fn launched(&self) -> Vec<TaskInfo> {
        self.launched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `(offer_id, reason)` of every decline.
    pub fn declined(&self) -> Vec<(String, String)> {
        self.declined
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LaunchDriver for RecordingDriver {
    fn launch_tasks(&self, offer_id: &str, tasks: Vec<TaskInfo>) -> Result<(), DriverError> {
        *self.launch_calls.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        if self.fail_launches.load(Ordering::SeqCst) {
            return Err(DriverError::Rejected(format!("offer {offer_id}")));
        }
        self.launched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(tasks);
        Ok(())
    }

    fn decline_offer(&self, offer_id: &str, reason: &str) -> Result<(), DriverError> {
        self.declined
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((offer_id.to_string(), reason.to_string()));
        Ok(())
    }
}
