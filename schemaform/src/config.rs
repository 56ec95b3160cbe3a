//! Form options and the TOML settings file.
//!
//! # Settings File Format
//!
//! ```toml
//! [form]
//! validate = true
//! validate_on_change = true
//!
//! [messages]
//! required = "Please fill in this field."
//! ```

use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::validate::MessageCatalog;

/// Default settings file name, looked up next to the data document.
pub const DEFAULT_SETTINGS_FILE: &str = ".schemaform.toml";

/// Behaviour switches of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Run a full validation right after the initial compile.
    pub validate: bool,
    /// Re-validate a field after each edit.
    #[serde(alias = "validateOnChange")]
    pub validate_on_change: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            validate: false,
            validate_on_change: true,
        }
    }
}

/// Contents of a settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub form: FormConfig,
    pub messages: MessageCatalog,
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Rule;

    #[test]
    fn test_defaults() {
        let config = FormConfig::default();
        assert!(!config.validate);
        assert!(config.validate_on_change);
        assert_eq!(toml::from_str::<Settings>("").unwrap(), Settings::default());
    }

    #[test]
    fn test_parse_settings() {
        let settings: Settings = toml::from_str(
            r#"
            [form]
            validate = true
            validateOnChange = false

            [messages]
            pattern = "Wrong format."
            "#,
        )
        .unwrap();
        assert!(settings.form.validate);
        assert!(!settings.form.validate_on_change);
        assert_eq!(settings.messages.message(Rule::Pattern), "Wrong format.");
    }

    #[test]
    fn test_load_missing_and_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SETTINGS_FILE);
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());

        fs::write(&path, "[form]\nvalidate = true\n").unwrap();
        assert!(Settings::load(&path).unwrap().form.validate);

        fs::write(&path, "[form\n").unwrap();
        assert!(Settings::load(&path).is_err());
    }
}
