use stackd_model::{Constraint, Offer};

use super::{DeclineReason, TaskRecord};

/// Evaluate one placement constraint against the tasks launched so far.
///
/// Absent attributes compare as the empty string on both sides.
pub(crate) fn check(constraint: &Constraint, tasks: &[TaskRecord], offer: &Offer) -> Option<DeclineReason> {
    match constraint {
        Constraint::Unique { attribute } => {
            let value = offer.attribute(attribute).unwrap_or("");
            tasks
                .iter()
                .any(|t| t.attribute(attribute) == value)
                .then(|| DeclineReason::Unique {
                    attribute: attribute.clone(),
                })
        }
    }
}
