use std::{
    cmp::Ordering,
    time::{Duration, Instant},
};

use stackd_model::{
    Application, ApplicationRunStatus, CommandInfo, ModelResult, Offer, Resource, RunFailure,
    TASK_ID_DELIMITER, TaskId, TaskInfo, TaskState, TaskStatus,
};
use tracing::{debug, trace, warn};

use super::{
    DeclineReason, ResultReceiver, ResultSender, TaskRecord, constraint, new_task_id,
    result_channel,
};
use crate::{driver::LaunchDriver, error::CoreError};

/// Runtime state of one staged application.
///
/// Invariant: until a failure is observed,
/// `tasks().len() + instances_left() == instance count`.
#[derive(Debug)]
pub struct ApplicationContext {
    application: Application,
    instances_left: u32,
    tasks: Vec<TaskRecord>,
    result: Option<ResultSender>,
    staged_at: Instant,
}

impl ApplicationContext {
    /// Validate `application` and build its context together with the
    /// receiver of its single terminal result.
    pub fn new(application: Application) -> ModelResult<(Self, ResultReceiver)> {
        application.validate()?;
        let instances_left = application.instance_count()?;
        let (tx, rx) = result_channel();
        let ctx = Self {
            application,
            instances_left,
            tasks: Vec::new(),
            result: Some(tx),
            staged_at: Instant::now(),
        };
        Ok((ctx, rx))
    }

    pub fn id(&self) -> &str {
        &self.application.id
    }

    pub fn application(&self) -> &Application {
        &self.application
    }

    /// Instances not launched yet.
    pub fn instances_left(&self) -> u32 {
        self.instances_left
    }

    /// Task records in launch order.
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    /// Time since the application was staged.
    pub fn elapsed(&self) -> Duration {
        self.staged_at.elapsed()
    }

    /// `true` once the terminal result has been handed to the channel.
    pub fn is_published(&self) -> bool {
        self.result.is_none()
    }

    /// Decide whether `offer` can host the next instance.
    ///
    /// Checks run in a fixed order and the first failing one wins:
    /// remaining instances, placement constraints, cpus, mem, hostname delimiter.
    pub fn matches(&self, offer: &Offer) -> Option<DeclineReason> {
        if self.instances_left == 0 {
            return Some(DeclineReason::AllInstancesStaged);
        }
        for c in &self.application.constraints {
            if let Some(reason) = constraint::check(c, &self.tasks, offer) {
                return Some(reason);
            }
        }
        if !covers(offer.cpus(), self.application.cpu) {
            return Some(DeclineReason::NoCpus);
        }
        if !covers(offer.mem(), self.application.mem) {
            return Some(DeclineReason::NoMem);
        }
        if offer.hostname.contains(TASK_ID_DELIMITER) {
            return Some(DeclineReason::ReservedDelimiter);
        }
        None
    }

    /// Describe a new instance of the application placed on `offer`.
    pub fn new_task_info(&self, offer: &Offer) -> ModelResult<TaskInfo> {
        let app = &self.application;
        Ok(TaskInfo {
            task_id: new_task_id(&app.id, &offer.hostname)?,
            name: TaskInfo::task_name(&app.id, &offer.hostname),
            offer_id: offer.id.clone(),
            hostname: offer.hostname.clone(),
            command: CommandInfo::shell(&app.launch_command, app.artifact_urls.clone()),
            resources: vec![Resource::cpus(app.cpu), Resource::mem(app.mem)],
        })
    }

    /// Launch one instance on `offer`.
    ///
    /// The instance slot is consumed only once the driver accepts the task;
    /// a rejected submission leaves the context unchanged.
    pub fn launch_task(&mut self, driver: &dyn LaunchDriver, offer: &Offer) -> Result<TaskId, CoreError> {
        let info = self.new_task_info(offer)?;
        let task_id = info.task_id.clone();

        driver.launch_tasks(&offer.id, vec![info])?;

        self.tasks
            .push(TaskRecord::staging(task_id.clone(), offer.host_attributes()));
        self.instances_left = self.instances_left.saturating_sub(1);
        debug!(
            app = %self.application.id,
            task = %task_id,
            left = self.instances_left,
            "task launched"
        );
        Ok(task_id)
    }

    /// Apply a status update. Returns `true` when the application became terminal.
    ///
    /// An update for an unknown task still runs the completion check.
    pub fn status_update(&mut self, status: &TaskStatus) -> bool {
        match status.state {
            TaskState::Staging | TaskState::Running => {
                self.set_state(status);
                false
            }
            TaskState::Finished => {
                self.set_state(status);
                if !self.all_tasks_finished() {
                    return false;
                }
                self.publish(ApplicationRunStatus::success(&self.application.id));
                true
            }
            state if state.is_failure() => {
                self.set_state(status);
                let failure = RunFailure {
                    hostname: status.task_id.hostname().to_string(),
                    state,
                };
                self.publish(ApplicationRunStatus::failure(&self.application.id, failure));
                true
            }
            state => {
                trace!(app = %self.application.id, task = %status.task_id, %state, "status ignored");
                false
            }
        }
    }

    /// Publish success if there is nothing left to do. Returns `true` when published.
    pub fn try_complete(&mut self) -> bool {
        if self.is_published() || !self.all_tasks_finished() {
            return false;
        }
        self.publish(ApplicationRunStatus::success(&self.application.id));
        true
    }

    /// No instances left to launch and every launched task finished.
    pub fn all_tasks_finished(&self) -> bool {
        self.instances_left == 0 && self.tasks.iter().all(|t| t.state == TaskState::Finished)
    }

    fn set_state(&mut self, status: &TaskStatus) {
        match self.tasks.iter_mut().find(|t| t.task_id == status.task_id) {
            Some(record) => record.state = status.state,
            None => trace!(task = %status.task_id, "status for unknown task"),
        }
    }

    /// Send the terminal result. Later calls are no-ops.
    fn publish(&mut self, status: ApplicationRunStatus) {
        let Some(tx) = self.result.take() else {
            debug!(app = %self.application.id, "result already published");
            return;
        };
        if tx.send(status).is_err() {
            warn!(app = %self.application.id, "result receiver dropped before completion");
        }
    }
}

/// `offered >= wanted`; a NaN on either side never covers.
fn covers(offered: f64, wanted: f64) -> bool {
    matches!(
        offered.partial_cmp(&wanted),
        Some(Ordering::Greater | Ordering::Equal)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::RecordingDriver;
    use stackd_model::{Attributes, Constraint};

    fn app() -> Application {
        Application {
            id: "foo".into(),
            app_type: "foo".into(),
            cpu: 0.5,
            mem: 512.0,
            instances: "3".into(),
            launch_command: "sleep 10".into(),
            ..Default::default()
        }
    }

    fn ctx_with(app: Application) -> (ApplicationContext, ResultReceiver) {
        ApplicationContext::new(app).unwrap()
    }

    fn full_offer(host: &str) -> Offer {
        Offer::new("o1", host)
            .with_resource(Resource::cpus(1.5))
            .with_resource(Resource::mem(2048.0))
    }

    fn record(id: &str, state: TaskState, host: Option<&str>) -> TaskRecord {
        let mut attrs = Attributes::new();
        if let Some(h) = host {
            attrs.insert("hostname", h);
        }
        TaskRecord {
            task_id: id.parse().unwrap(),
            state,
            attributes: attrs,
        }
    }

    #[test]
    fn new_rejects_bad_instances() {
        let mut a = app();
        a.instances = "many".into();
        assert!(ApplicationContext::new(a).is_err());
    }

    #[test]
    fn declines_when_all_instances_staged() {
        let (mut ctx, _rx) = ctx_with(app());
        ctx.instances_left = 0;
        assert_eq!(
            ctx.matches(&full_offer("slave0")),
            Some(DeclineReason::AllInstancesStaged)
        );
    }

    #[test]
    fn declines_on_unique_violation() {
        let (mut ctx, _rx) = ctx_with(app().with_constraint(Constraint::unique("hostname")));
        ctx.instances_left = 1;
        ctx.tasks
            .push(record("foo|slave0|a", TaskState::Staging, Some("slave0")));

        let reason = ctx.matches(&Offer::new("o1", "slave0")).unwrap();
        assert!(reason.to_string().contains("hostname doesn't match unique"));
    }

    #[test]
    fn constraint_is_checked_before_resources() {
        let (mut ctx, _rx) = ctx_with(app().with_constraint(Constraint::unique("hostname")));
        ctx.tasks
            .push(record("foo|slave0|a", TaskState::Running, Some("slave0")));
        // empty offer would also fail the cpu check
        assert!(matches!(
            ctx.matches(&Offer::new("o1", "slave0")),
            Some(DeclineReason::Unique { .. })
        ));
    }

    #[test]
    fn declines_without_cpus_then_mem() {
        let (ctx, _rx) = ctx_with(app());
        assert_eq!(ctx.matches(&Offer::new("o1", "slave0")), Some(DeclineReason::NoCpus));

        let cpu_only = Offer::new("o1", "slave0").with_resource(Resource::cpus(1.5));
        assert_eq!(ctx.matches(&cpu_only), Some(DeclineReason::NoMem));
    }

    #[test]
    fn accepts_matching_offer() {
        let (ctx, _rx) = ctx_with(app());
        assert_eq!(ctx.matches(&full_offer("slave0")), None);
    }

    #[test]
    fn exact_resources_are_enough() {
        let (ctx, _rx) = ctx_with(app());
        let offer = Offer::new("o1", "slave0")
            .with_resource(Resource::cpus(0.5))
            .with_resource(Resource::mem(512.0));
        assert_eq!(ctx.matches(&offer), None);
    }

    #[test]
    fn declines_nan_resources() {
        let (ctx, _rx) = ctx_with(app());
        let offer = Offer::new("o1", "slave0")
            .with_resource(Resource::cpus(f64::NAN))
            .with_resource(Resource::mem(f64::NAN));
        assert_eq!(ctx.matches(&offer), Some(DeclineReason::NoCpus));

        let nan_mem = Offer::new("o1", "slave0")
            .with_resource(Resource::cpus(1.5))
            .with_resource(Resource::mem(f64::NAN));
        assert_eq!(ctx.matches(&nan_mem), Some(DeclineReason::NoMem));
    }

    #[test]
    fn declines_hostname_with_delimiter() {
        let (ctx, _rx) = ctx_with(app());
        assert_eq!(
            ctx.matches(&full_offer("sla|ve0")),
            Some(DeclineReason::ReservedDelimiter)
        );
    }

    #[test]
    fn builds_task_info() {
        let mut a = app();
        a.artifact_urls = vec!["http://elodina.net".into()];
        let (ctx, _rx) = ctx_with(a);

        let info = ctx.new_task_info(&full_offer("slave0")).unwrap();
        assert_eq!(info.name, "foo.slave0");
        assert!(info.task_id.as_str().contains("foo|slave0|"));
        assert_eq!(info.command.value, "sleep 10");
        assert!(info.command.shell);
        assert_eq!(info.command.uris, vec!["http://elodina.net".to_string()]);
        assert_eq!(info.cpus(), 0.5);
        assert_eq!(info.mem(), 512.0);
        assert_eq!(info.offer_id, "o1");
    }

    #[test]
    fn not_finished_while_instances_pending() {
        let (mut ctx, _rx) = ctx_with(app());
        ctx.instances_left = 1;
        assert!(!ctx.all_tasks_finished());

        ctx.instances_left = 0;
        ctx.tasks
            .push(record("foo|slave0|a", TaskState::Staging, Some("slave0")));
        assert!(!ctx.all_tasks_finished());
    }

    #[test]
    fn finished_when_nothing_left() {
        let (mut ctx, _rx) = ctx_with(app());
        ctx.instances_left = 0;
        assert!(ctx.all_tasks_finished());

        ctx.tasks
            .push(record("foo|slave0|a", TaskState::Finished, Some("slave0")));
        assert!(ctx.all_tasks_finished());
    }

    #[test]
    fn launch_task_consumes_slot() {
        let (mut ctx, _rx) = ctx_with(app());
        let driver = RecordingDriver::new();

        let id = ctx.launch_task(&driver, &full_offer("slave0")).unwrap();
        assert_eq!(driver.launch_count(), 1);
        assert_eq!(ctx.instances_left(), 2);
        assert_eq!(ctx.tasks().len(), 1);
        assert_eq!(ctx.tasks()[0].state, TaskState::Staging);
        assert_eq!(ctx.tasks()[0].task_id, id);
        assert_eq!(ctx.tasks()[0].attribute("hostname"), "slave0");
    }

    #[test]
    fn rejected_launch_leaves_context_unchanged() {
        let (mut ctx, _rx) = ctx_with(app());
        let driver = RecordingDriver::failing();

        let err = ctx.launch_task(&driver, &full_offer("slave0")).unwrap_err();
        assert!(matches!(err, CoreError::Launch(_)));
        assert_eq!(ctx.instances_left(), 3);
        assert!(ctx.tasks().is_empty());
    }

    fn staged_ctx() -> (ApplicationContext, ResultReceiver, TaskId) {
        let (mut ctx, rx) = ctx_with(app());
        let id: TaskId = "foo|slave0|asd-asd-asd-asd-asd".parse().unwrap();
        ctx.instances_left = 3;
        ctx.tasks.push(TaskRecord::staging(id.clone(), Attributes::new()));
        (ctx, rx, id)
    }

    #[test]
    fn running_status_does_not_publish() {
        let (mut ctx, mut rx, id) = staged_ctx();
        assert!(!ctx.status_update(&TaskStatus::new(id, TaskState::Running)));
        assert_eq!(ctx.tasks()[0].state, TaskState::Running);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn finished_with_pending_instances_does_not_publish() {
        let (mut ctx, mut rx, id) = staged_ctx();
        assert!(!ctx.status_update(&TaskStatus::new(id, TaskState::Finished)));
        assert_eq!(ctx.tasks()[0].state, TaskState::Finished);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn last_finished_publishes_success() {
        let (mut ctx, mut rx, id) = staged_ctx();
        ctx.instances_left = 0;
        assert!(ctx.status_update(&TaskStatus::new(id, TaskState::Finished)));
        let status = rx.try_recv().unwrap();
        assert!(status.is_success());
        assert_eq!(status.application_id, "foo");
    }

    #[test]
    fn failure_states_fail_fast() {
        for state in [TaskState::Lost, TaskState::Failed, TaskState::Error] {
            let (mut ctx, mut rx, id) = staged_ctx();
            assert!(ctx.status_update(&TaskStatus::new(id, state)));

            let err = rx.try_recv().unwrap().into_result().unwrap_err();
            assert!(err.to_string().contains("failed to run on host slave0"));
            assert_eq!(err.state, state);
        }
    }

    #[test]
    fn unrecognized_states_are_ignored() {
        for state in [TaskState::Starting, TaskState::Killing, TaskState::Killed] {
            let (mut ctx, mut rx, id) = staged_ctx();
            assert!(!ctx.status_update(&TaskStatus::new(id, state)));
            assert_eq!(ctx.tasks()[0].state, TaskState::Staging);
            assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn publishes_at_most_once() {
        let (mut ctx, mut rx, id) = staged_ctx();
        assert!(ctx.status_update(&TaskStatus::new(id.clone(), TaskState::Lost)));
        assert!(ctx.is_published());
        // a second terminal update is absorbed
        assert!(ctx.status_update(&TaskStatus::new(id, TaskState::Failed)));
        assert_eq!(rx.try_recv().unwrap().error.unwrap().state, TaskState::Lost);
    }

    #[test]
    fn try_complete_only_when_finished() {
        let (mut ctx, mut rx) = ctx_with(app());
        assert!(!ctx.try_complete());

        let mut empty = app();
        empty.instances = "0".into();
        let (mut ctx0, mut rx0) = ctx_with(empty);
        assert!(ctx0.try_complete());
        assert!(!ctx0.try_complete());
        assert!(rx0.try_recv().unwrap().is_success());

        ctx.instances_left = 0;
        assert!(ctx.try_complete());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn publishing_to_dropped_receiver_does_not_panic() {
        let (mut ctx, rx, id) = staged_ctx();
        drop(rx);
        assert!(ctx.status_update(&TaskStatus::new(id, TaskState::Error)));
    }
}
