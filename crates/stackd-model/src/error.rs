use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed task id '{0}': expected <application>|<hostname>|<instance>")]
    InvalidTaskId(String),

    #[error("{field} must not contain the reserved '|' delimiter: {value}")]
    ReservedDelimiter { field: &'static str, value: String },

    #[error("invalid instance count for application '{id}': {value}")]
    InvalidInstances { id: String, value: String },

    #[error("invalid constraint: {0}")]
    InvalidConstraint(String),

    #[error("unknown constraint operator: {0}")]
    UnknownConstraint(String),

    #[error("unknown task state: {0}")]
    UnknownTaskState(String),

    #[error("unknown application state code: {0}")]
    UnknownApplicationState(i32),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
