use stackd_model::{ModelResult, TaskId};
use uuid::Uuid;

/// Fresh task id for an instance of `application_id` on `hostname`.
///
/// The instance field is a random v4 UUID.
pub fn new_task_id(application_id: &str, hostname: &str) -> ModelResult<TaskId> {
    TaskId::new(application_id, hostname, &Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_prefixed() {
        let a = new_task_id("foo", "slave0").unwrap();
        let b = new_task_id("foo", "slave0").unwrap();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("foo|slave0|"));
        assert!(Uuid::parse_str(a.instance()).is_ok());
    }

    #[test]
    fn hostname_with_delimiter_is_rejected() {
        assert!(new_task_id("foo", "sla|ve0").is_err());
    }
}
