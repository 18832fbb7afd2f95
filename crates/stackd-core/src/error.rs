use stackd_model::{ApplicationId, ModelError};
use thiserror::Error;

use crate::driver::DriverError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("application '{0}' is already staged")]
    AlreadyStaged(ApplicationId),

    #[error("invalid application: {0}")]
    InvalidApplication(#[from] ModelError),

    #[error("task launch failed: {0}")]
    Launch(#[from] DriverError),
}
