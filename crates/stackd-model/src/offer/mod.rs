mod resource;
pub use resource::Resource;

use serde::{Deserialize, Serialize};

use crate::domain::{ATTRIBUTE_HOSTNAME, Attributes, Hostname, RESOURCE_CPUS, RESOURCE_MEM};

/// Capacity offered by the resource manager on a single host.
///
/// The framework either launches a task on it or declines it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// Resource-manager offer identifier (echoed back on launch/decline).
    #[serde(default)]
    pub id: String,
    /// Host the resources belong to.
    pub hostname: Hostname,
    /// Host attributes.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// Offered scalar resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
}

impl Offer {
    /// Create an offer with no resources and no attributes.
    pub fn new(id: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    /// Add a resource and return the updated offer.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Add a host attribute and return the updated offer.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Total quantity of the scalar resource `name` (0.0 when absent).
    ///
    /// Several entries with the same name (e.g. per role) are summed.
    pub fn scalar(&self, name: &str) -> f64 {
        self.resources
            .iter()
            .filter(|r| r.name == name)
            .map(|r| r.value)
            .sum()
    }

    pub fn cpus(&self) -> f64 {
        self.scalar(RESOURCE_CPUS)
    }

    pub fn mem(&self) -> f64 {
        self.scalar(RESOURCE_MEM)
    }

    /// Value of a host attribute.
    ///
    /// `hostname` falls back to the offer hostname when it is not advertised as an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).or_else(|| {
            (name == ATTRIBUTE_HOSTNAME).then_some(self.hostname.as_str())
        })
    }

    /// Attributes recorded on a task launched from this offer (always includes `hostname`).
    pub fn host_attributes(&self) -> Attributes {
        let mut attrs = self.attributes.clone();
        if !attrs.contains_key(ATTRIBUTE_HOSTNAME) {
            attrs.insert(ATTRIBUTE_HOSTNAME, self.hostname.as_str());
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_sums_same_named_resources() {
        let offer = Offer::new("o1", "slave0")
            .with_resource(Resource::cpus(1.0))
            .with_resource(Resource::cpus(0.5))
            .with_resource(Resource::mem(2048.0));

        assert_eq!(offer.cpus(), 1.5);
        assert_eq!(offer.mem(), 2048.0);
        assert_eq!(offer.scalar("disk"), 0.0);
    }

    #[test]
    fn empty_offer_has_no_resources() {
        let offer = Offer::new("o1", "slave0");
        assert_eq!(offer.cpus(), 0.0);
        assert_eq!(offer.mem(), 0.0);
    }

    #[test]
    fn hostname_attribute_falls_back_to_offer_hostname() {
        let offer = Offer::new("o1", "slave0").with_attribute("rack", "r1");
        assert_eq!(offer.attribute("hostname"), Some("slave0"));
        assert_eq!(offer.attribute("rack"), Some("r1"));
        assert_eq!(offer.attribute("zone"), None);
    }

    #[test]
    fn explicit_hostname_attribute_wins() {
        let offer = Offer::new("o1", "slave0").with_attribute("hostname", "alias0");
        assert_eq!(offer.attribute("hostname"), Some("alias0"));
        assert_eq!(offer.host_attributes().get("hostname"), Some("alias0"));
    }

    #[test]
    fn host_attributes_include_hostname() {
        let attrs = Offer::new("o1", "slave0")
            .with_attribute("rack", "r1")
            .host_attributes();
        assert_eq!(attrs.get("hostname"), Some("slave0"));
        assert_eq!(attrs.get("rack"), Some("r1"));
    }
}
