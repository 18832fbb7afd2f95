//! Well-known keys shared by the model and the scheduling core.

/// Separator between the fields of a task id (`<application>|<hostname>|<instance>`).
///
/// Reserved: it may not appear in an application id or a hostname.
pub const TASK_ID_DELIMITER: char = '|';

/// Name of the scalar resource carrying CPU shares in an offer.
pub const RESOURCE_CPUS: &str = "cpus";

/// Name of the scalar resource carrying memory (MB) in an offer.
pub const RESOURCE_MEM: &str = "mem";

/// Attribute key that resolves to the offer hostname when the offer does not carry it explicitly.
pub const ATTRIBUTE_HOSTNAME: &str = "hostname";
