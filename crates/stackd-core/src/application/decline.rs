use std::fmt;

/// Why an offer was not used.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclineReason {
    /// No application is staged.
    NoApplications,
    /// The application has launched every instance.
    AllInstancesStaged,
    /// A `UNIQUE` constraint on `attribute` would be violated.
    Unique { attribute: String },
    NoCpus,
    NoMem,
    /// The offer hostname contains the task-id delimiter.
    ReservedDelimiter,
}

impl DeclineReason {
    /// Low-cardinality label for metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            DeclineReason::NoApplications => "no_applications",
            DeclineReason::AllInstancesStaged => "all_instances_staged",
            DeclineReason::Unique { .. } => "unique",
            DeclineReason::NoCpus => "no_cpus",
            DeclineReason::NoMem => "no_mem",
            DeclineReason::ReservedDelimiter => "reserved_delimiter",
        }
    }
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclineReason::NoApplications => f.write_str("all tasks are running"),
            DeclineReason::AllInstancesStaged => f.write_str("all instances are staged/running"),
            DeclineReason::Unique { attribute } => write!(f, "{attribute} doesn't match unique"),
            DeclineReason::NoCpus => f.write_str("no cpus"),
            DeclineReason::NoMem => f.write_str("no mem"),
            DeclineReason::ReservedDelimiter => f.write_str("hostname contains reserved delimiter"),
        }
    }
}
