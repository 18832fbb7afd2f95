use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Host attributes (name → value) advertised with an offer.
///
/// Tasks keep a copy of the attributes of the host they were launched on,
/// which is what placement constraints are later evaluated against.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(pub BTreeMap<String, String>);

impl Attributes {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns `true` if no attributes are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Insert or overwrite an attribute.
    ///
    /// Returns `self` for chaining.
    pub fn insert<K, V>(&mut self, key: K, val: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), val.into());
        self
    }

    /// Get the value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate through all attributes as `(&str, &str)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::Attributes;

    #[test]
    fn insert_overwrites_and_chains() {
        let mut attrs = Attributes::new();
        attrs.insert("rack", "r1").insert("zone", "eu").insert("rack", "r2");

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("rack"), Some("r2"));
        assert_eq!(attrs.get("zone"), Some("eu"));
        assert!(attrs.get("missing").is_none());
    }

    #[test]
    fn collects_from_pairs() {
        let attrs: Attributes = [("hostname", "slave0"), ("rack", "r1")].into_iter().collect();
        assert!(attrs.contains_key("hostname"));
        assert_eq!(attrs.iter().count(), 2);
    }

    #[test]
    fn serializes_as_plain_map() {
        let attrs: Attributes = [("rack", "r1")].into_iter().collect();
        let json = serde_json::to_string(&attrs).unwrap();
        assert_eq!(json, r#"{"rack":"r1"}"#);
    }
}
