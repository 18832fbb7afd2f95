//! Registry of staged run-once applications.
//!
//! The runner routes every offer to the first staged application that can use
//! it (staging order) and every status update to the application named in the
//! task id. Applications are retired the moment they publish their result.
mod context;
pub use context::RunnerContext;

mod outcome;
pub use outcome::OfferOutcome;

mod recorder;

use std::sync::{Mutex, MutexGuard, PoisonError};

use stackd_model::{Application, ApplicationId, ApplicationState, Offer, TaskState, TaskStatus};
use tracing::{debug, info, instrument, trace, warn};

use crate::{
    application::{ApplicationContext, DeclineReason, ResultReceiver, TaskRecord},
    driver::LaunchDriver,
    error::CoreError,
    metrics::RunOutcome,
};

/// Run-once scheduler.
///
/// All operations serialize on one lock; none of them waits on a task.
#[derive(Debug, Default)]
pub struct RunOnceRunner {
    applications: Mutex<Vec<ApplicationContext>>,
    ctx: RunnerContext,
}

impl RunOnceRunner {
    /// Create an empty runner with a default context.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the collaborators used for state recording and metrics.
    #[inline]
    pub fn with_context(mut self, ctx: RunnerContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn context(&self) -> &RunnerContext {
        &self.ctx
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ApplicationContext>> {
        self.applications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Stage `application` and return the receiver of its single result.
    ///
    /// An application with zero instances completes immediately and is never registered.
    #[instrument(level = "debug", skip(self, application), fields(app = %application.id))]
    pub fn stage_application(&self, application: Application) -> Result<ResultReceiver, CoreError> {
        let mut apps = self.lock();
        if apps.iter().any(|c| c.id() == application.id) {
            return Err(CoreError::AlreadyStaged(application.id));
        }

        let (mut ctx, rx) = ApplicationContext::new(application)?;
        recorder::record_application(&self.ctx, ctx.application(), ApplicationState::Staging);

        if ctx.try_complete() {
            info!(app = %ctx.id(), "nothing to run, application completed");
            self.complete(&ctx, RunOutcome::Success);
            return Ok(rx);
        }

        info!(app = %ctx.id(), instances = ctx.instances_left(), "application staged");
        apps.push(ctx);
        Ok(rx)
    }

    /// Offer resources to the staged applications.
    ///
    /// At most one task is launched per offer. When nothing matches, the reason
    /// of the last application evaluated is returned.
    #[instrument(level = "debug", skip(self, driver, offer), fields(offer = %offer.id, host = %offer.hostname))]
    pub fn resource_offer(&self, driver: &dyn LaunchDriver, offer: &Offer) -> Result<OfferOutcome, CoreError> {
        let mut apps = self.lock();
        let mut reason = DeclineReason::NoApplications;

        for ctx in apps.iter_mut() {
            if let Some(r) = ctx.matches(offer) {
                trace!(app = %ctx.id(), reason = %r, "offer does not match");
                reason = r;
                continue;
            }

            return match ctx.launch_task(driver, offer) {
                Ok(task_id) => {
                    self.ctx
                        .metrics()
                        .record_task_launched(&ctx.application().app_type);
                    recorder::record_task(&self.ctx, &task_id, ctx.tasks().last(), ApplicationState::Staging);
                    info!(app = %ctx.id(), task = %task_id, host = %offer.hostname, "task launched");
                    Ok(OfferOutcome::Launched(task_id))
                }
                Err(e) => {
                    let kind = match &e {
                        CoreError::Launch(de) => de.as_label(),
                        _ => "invalid",
                    };
                    self.ctx
                        .metrics()
                        .record_launch_error(&ctx.application().app_type, kind);
                    warn!(app = %ctx.id(), host = %offer.hostname, error = %e, "task launch failed");
                    Err(e)
                }
            };
        }

        self.ctx.metrics().record_offer_declined(reason.as_label());
        debug!(reason = %reason, "offer declined");
        Ok(OfferOutcome::Declined(reason))
    }

    /// Route a status update to the owning application.
    ///
    /// Returns `false` when no staged application owns the task.
    #[instrument(level = "debug", skip(self, status), fields(task = %status.task_id, state = %status.state))]
    pub fn status_update(&self, status: &TaskStatus) -> bool {
        let mut apps = self.lock();
        let app_id = status.task_id.application_id();
        let Some(pos) = apps.iter().position(|c| c.id() == app_id) else {
            debug!(app = app_id, "status for unknown application");
            return false;
        };

        let ctx = &mut apps[pos];
        let done = ctx.status_update(status);

        if let Some(state) = recorder::lifecycle_state(status.state) {
            let record = ctx.tasks().iter().find(|t| t.task_id == status.task_id);
            recorder::record_task(&self.ctx, &status.task_id, record, state);
            if status.state == TaskState::Running {
                recorder::record_application(&self.ctx, ctx.application(), ApplicationState::Running);
            }
        }

        if done {
            let ctx = apps.remove(pos);
            let outcome = if status.state.is_failure() {
                warn!(app = %ctx.id(), host = status.task_id.hostname(), state = %status.state, "application failed");
                RunOutcome::Failure
            } else {
                info!(app = %ctx.id(), "application finished");
                RunOutcome::Success
            };
            self.complete(&ctx, outcome);
        }
        true
    }

    /// Metrics and state for a retired application.
    fn complete(&self, ctx: &ApplicationContext, outcome: RunOutcome) {
        let app = ctx.application();
        let elapsed = u64::try_from(ctx.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.ctx
            .metrics()
            .record_application_completed(&app.app_type, outcome, elapsed);
        let state = match outcome {
            RunOutcome::Success => ApplicationState::Idle,
            RunOutcome::Failure => ApplicationState::Fail,
        };
        recorder::record_application(&self.ctx, app, state);
    }

    /// `true` if an application with this id is staged and not yet retired.
    pub fn is_staged(&self, id: &str) -> bool {
        self.lock().iter().any(|c| c.id() == id)
    }

    /// Ids of staged applications, in staging order.
    pub fn staged_applications(&self) -> Vec<ApplicationId> {
        self.lock().iter().map(|c| c.id().to_string()).collect()
    }

    /// Instances not launched yet, `None` if the application is not staged.
    pub fn instances_left(&self, id: &str) -> Option<u32> {
        self.lock()
            .iter()
            .find(|c| c.id() == id)
            .map(|c| c.instances_left())
    }

    /// Snapshot of an application's task records.
    pub fn tasks(&self, id: &str) -> Option<Vec<TaskRecord>> {
        self.lock()
            .iter()
            .find(|c| c.id() == id)
            .map(|c| c.tasks().to_vec())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
