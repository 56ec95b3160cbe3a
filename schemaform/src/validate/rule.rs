use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Identifier of a validation rule.
///
/// Validation reports rule identifiers only; display text comes from a
/// [`MessageCatalog`](super::MessageCatalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// Value must not be empty.
    Required,
    /// Value must be one of the allowed options.
    EnumMembership,
    /// Value must be an integral number.
    IntegerFormat,
    /// Value must match the schema pattern.
    Pattern,
}

impl Rule {
    /// All rules in evaluation order.
    pub const ALL: [Rule; 4] = [
        Rule::Required,
        Rule::EnumMembership,
        Rule::IntegerFormat,
        Rule::Pattern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::EnumMembership => "enum-membership",
            Rule::IntegerFormat => "integer-format",
            Rule::Pattern => "pattern",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown rule identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rule `{0}`")]
pub struct UnknownRule(pub String);

impl FromStr for Rule {
    type Err = UnknownRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRule(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        for rule in Rule::ALL {
            assert_eq!(rule.as_str().parse::<Rule>(), Ok(rule));
            assert_eq!(
                serde_json::to_value(rule).unwrap(),
                serde_json::Value::String(rule.to_string())
            );
        }
        assert_eq!(
            "integer".parse::<Rule>(),
            Err(UnknownRule("integer".to_string()))
        );
    }
}
