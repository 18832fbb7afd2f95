use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("resource manager rejected the request: {0}")]
    Rejected(String),

    #[error("driver is not connected")]
    NotConnected,

    #[error("driver error: {0}")]
    Internal(String),
}

impl DriverError {
    /// Error category used as a metrics label.
    pub fn as_label(&self) -> &'static str {
        match self {
            DriverError::Rejected(_) => "rejected",
            DriverError::NotConnected => "not_connected",
            DriverError::Internal(_) => "internal",
        }
    }
}
