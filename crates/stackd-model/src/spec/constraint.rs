use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Placement operator of a [`Constraint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintOperator {
    /// No two instances may land on hosts sharing the same attribute value.
    Unique,
}

impl FromStr for ConstraintOperator {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unique" => Ok(ConstraintOperator::Unique),
            other => Err(ModelError::UnknownConstraint(other.to_string())),
        }
    }
}

impl fmt::Display for ConstraintOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintOperator::Unique => f.write_str("UNIQUE"),
        }
    }
}

/// Placement rule restricting which offers an application may use.
///
/// On the wire a constraint is the pair `["<attribute>", "<OPERATOR>"]`,
/// e.g. `["hostname", "UNIQUE"]`. It is parsed once into a variant so that
/// matching never has to look at raw strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum Constraint {
    /// Every instance must run on a host with a distinct value of `attribute`.
    Unique { attribute: String },
}

impl Constraint {
    /// Build a `UNIQUE` constraint on the given attribute.
    pub fn unique(attribute: impl Into<String>) -> Self {
        Constraint::Unique {
            attribute: attribute.into(),
        }
    }

    /// Host attribute this constraint is evaluated against.
    pub fn attribute(&self) -> &str {
        match self {
            Constraint::Unique { attribute } => attribute,
        }
    }

    pub fn operator(&self) -> ConstraintOperator {
        match self {
            Constraint::Unique { .. } => ConstraintOperator::Unique,
        }
    }

    /// Build a constraint from its `(attribute, operator)` wire form.
    pub fn from_pair(attribute: &str, operator: &str) -> ModelResult<Self> {
        if attribute.trim().is_empty() {
            return Err(ModelError::InvalidConstraint(
                "constraint attribute is empty".into(),
            ));
        }
        match operator.parse::<ConstraintOperator>()? {
            ConstraintOperator::Unique => Ok(Constraint::unique(attribute)),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.attribute(), self.operator())
    }
}

impl TryFrom<Vec<String>> for Constraint {
    type Error = ModelError;
    fn try_from(parts: Vec<String>) -> ModelResult<Self> {
        match parts.as_slice() {
            [attribute, operator] => Constraint::from_pair(attribute, operator),
            other => Err(ModelError::InvalidConstraint(format!(
                "expected [attribute, operator], got {} element(s)",
                other.len()
            ))),
        }
    }
}

impl From<Constraint> for Vec<String> {
    fn from(c: Constraint) -> Self {
        vec![c.attribute().to_string(), c.operator().to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_parses_case_insensitive() {
        for s in ["UNIQUE", "unique", " Unique "] {
            assert_eq!(s.parse::<ConstraintOperator>().unwrap(), ConstraintOperator::Unique);
        }
        assert!(matches!(
            "CLUSTER".parse::<ConstraintOperator>(),
            Err(ModelError::UnknownConstraint(_))
        ));
    }

    #[test]
    fn deserializes_wire_pair() {
        let c: Constraint = serde_json::from_str(r#"["hostname", "UNIQUE"]"#).unwrap();
        assert_eq!(c, Constraint::unique("hostname"));
        assert_eq!(c.attribute(), "hostname");
    }

    #[test]
    fn serializes_back_to_wire_pair() {
        let json = serde_json::to_string(&Constraint::unique("rack")).unwrap();
        assert_eq!(json, r#"["rack","UNIQUE"]"#);
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(serde_json::from_str::<Constraint>(r#"["hostname"]"#).is_err());
        assert!(serde_json::from_str::<Constraint>(r#"["hostname","UNIQUE","x"]"#).is_err());
        assert!(serde_json::from_str::<Constraint>(r#"["", "UNIQUE"]"#).is_err());
        assert!(serde_json::from_str::<Constraint>(r#"["hostname","LIKE"]"#).is_err());
    }
}
