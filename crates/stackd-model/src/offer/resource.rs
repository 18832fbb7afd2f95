use serde::{Deserialize, Serialize};

use crate::domain::{RESOURCE_CPUS, RESOURCE_MEM};

/// Named scalar quantity (e.g. `cpus = 1.5`, `mem = 2048`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub value: f64,
}

impl Resource {
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn cpus(value: f64) -> Self {
        Self::scalar(RESOURCE_CPUS, value)
    }

    pub fn mem(value: f64) -> Self {
        Self::scalar(RESOURCE_MEM, value)
    }
}
