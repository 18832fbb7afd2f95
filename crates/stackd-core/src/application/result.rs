use stackd_model::ApplicationRunStatus;
use tokio::sync::oneshot;

/// Receiving end of an application's one-shot result.
pub type ResultReceiver = oneshot::Receiver<ApplicationRunStatus>;

/// Sending end, owned by the [`super::ApplicationContext`].
pub type ResultSender = oneshot::Sender<ApplicationRunStatus>;

/// Capacity-one channel carrying the terminal result of one application.
pub fn result_channel() -> (ResultSender, ResultReceiver) {
    oneshot::channel()
}
