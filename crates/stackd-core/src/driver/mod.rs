//! Launch-driver seam between the scheduler and the resource manager.
//!
//! The scheduler never talks to the resource manager directly: launches and
//! declines go through a [`LaunchDriver`] passed in with every offer.
mod error;
pub use error::DriverError;

mod recording;
pub use recording::RecordingDriver;

use stackd_model::TaskInfo;

/// Submits tasks to, and declines offers from, the resource manager.
pub trait LaunchDriver: Send + Sync {
    /// Submit `tasks` against the offer `offer_id`.
    ///
    /// `Ok` means the resource manager accepted the submission; the tasks'
    /// progress is reported later through status updates.
    fn launch_tasks(&self, offer_id: &str, tasks: Vec<TaskInfo>) -> Result<(), DriverError>;

    /// Hand an unused offer back to the resource manager.
    fn decline_offer(&self, offer_id: &str, reason: &str) -> Result<(), DriverError>;
}
