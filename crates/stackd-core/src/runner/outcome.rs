use std::fmt;

use stackd_model::TaskId;

use crate::application::DeclineReason;

/// What the runner did with an offer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OfferOutcome {
    /// One task was launched on the offer.
    Launched(TaskId),
    /// The offer should be declined.
    Declined(DeclineReason),
}

impl OfferOutcome {
    /// Decline reason, `None` when a task was launched.
    pub fn decline_reason(&self) -> Option<&DeclineReason> {
        match self {
            OfferOutcome::Launched(_) => None,
            OfferOutcome::Declined(reason) => Some(reason),
        }
    }
}

impl fmt::Display for OfferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OfferOutcome::Launched(id) => write!(f, "launched {id}"),
            OfferOutcome::Declined(reason) => write!(f, "declined: {reason}"),
        }
    }
}
