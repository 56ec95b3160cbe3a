use std::collections::BTreeMap;

use serde::Deserialize;

use super::{Rule, rule::UnknownRule};

/// Display text for each rule identifier.
///
/// Starts from the built-in messages; individual entries can be replaced,
/// either in code or from the `[messages]` table of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>")]
pub struct MessageCatalog {
    overrides: BTreeMap<Rule, String>,
}

impl TryFrom<BTreeMap<String, String>> for MessageCatalog {
    type Error = UnknownRule;

    fn try_from(table: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let overrides = table
            .into_iter()
            .map(|(k, v)| Ok((k.parse::<Rule>()?, v)))
            .collect::<Result<_, UnknownRule>>()?;
        Ok(Self { overrides })
    }
}

impl MessageCatalog {
    /// Built-in message for `rule`.
    pub fn default_message(rule: Rule) -> &'static str {
        match rule {
            Rule::Required => "This field is required.",
            Rule::EnumMembership => "The value is not one of the options.",
            Rule::IntegerFormat => "The value is not an integer.",
            Rule::Pattern => "This value does not match the pattern.",
        }
    }

    /// Replace the message shown for `rule`.
    pub fn with_message(mut self, rule: Rule, message: impl Into<String>) -> Self {
        self.overrides.insert(rule, message.into());
        self
    }

    pub fn message(&self, rule: Rule) -> &str {
        self.overrides
            .get(&rule)
            .map(String::as_str)
            .unwrap_or_else(|| Self::default_message(rule))
    }

    /// One message per violated rule, in order.
    pub fn render<'a>(&'a self, errors: &'a [Rule]) -> impl Iterator<Item = &'a str> + 'a {
        errors.iter().map(|r| self.message(*r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = MessageCatalog::default();
        assert_eq!(catalog.message(Rule::Required), "This field is required.");
        assert_eq!(
            catalog.message(Rule::Pattern),
            "This value does not match the pattern."
        );
    }

    #[test]
    fn test_override() {
        let catalog = MessageCatalog::default().with_message(Rule::Required, "Obligatoire.");
        let rendered: Vec<_> = catalog
            .render(&[Rule::Required, Rule::IntegerFormat])
            .collect();
        assert_eq!(rendered, ["Obligatoire.", "The value is not an integer."]);
    }

    #[test]
    fn test_from_toml_table() {
        let catalog: MessageCatalog = toml::from_str("enum-membership = \"Pick one.\"").unwrap();
        assert_eq!(catalog.message(Rule::EnumMembership), "Pick one.");
        assert_eq!(catalog.message(Rule::Required), "This field is required.");

        assert!(toml::from_str::<MessageCatalog>("integer = \"Nope.\"").is_err());
    }
}
