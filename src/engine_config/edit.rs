//! Keyed edits applied to an [`EngineConfig`].

use super::document::{EngineConfig, Entry, Line};
use crate::error::SetupError;
use serde::{Deserialize, Serialize};

/// A single edit, addressed by key rather than line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ConfigEdit {
    /// Write `key = value`, enabling the entry if it was commented out
    Set { key: String, value: String },
    /// Comment the entry out, keeping its current value
    Disable { key: String },
}

impl ConfigEdit {
    pub fn set(key: &str, value: &str) -> Self {
        ConfigEdit::Set {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn disable(key: &str) -> Self {
        ConfigEdit::Disable {
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            ConfigEdit::Set { key, .. } | ConfigEdit::Disable { key } => key,
        }
    }
}

impl EngineConfig {
    /// Apply `edit` in place. Fails without modifying anything if the key is absent.
    pub fn apply_edit(&mut self, edit: &ConfigEdit) -> Result<(), SetupError> {
        let idx = self
            .find(edit.key())
            .ok_or_else(|| SetupError::MissingConfigKey(edit.key().to_string()))?;
        let current = self.lines()[idx]
            .entry()
            .cloned()
            .ok_or_else(|| SetupError::MissingConfigKey(edit.key().to_string()))?;

        let updated = match edit {
            ConfigEdit::Set { value, .. } => Entry {
                value: value.clone(),
                comment: None,
                enabled: true,
                ..current
            },
            ConfigEdit::Disable { .. } => Entry {
                comment: None,
                enabled: false,
                ..current
            },
        };
        self.set_line(idx, Line::from_entry(updated));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Logs------
logSearchInfo = false
# ogsChatToStderr = true

maxVisits = 500
# maxTime = 10.0
ponderingEnabled = false
";

    #[test]
    fn test_set_and_disable_produce_literal_lines() {
        let mut config = EngineConfig::parse(SAMPLE);
        config.apply_edit(&ConfigEdit::set("logSearchInfo", "true")).unwrap();
        config.apply_edit(&ConfigEdit::set("ogsChatToStderr", "True")).unwrap();
        config.apply_edit(&ConfigEdit::disable("maxVisits")).unwrap();
        config.apply_edit(&ConfigEdit::set("maxTime", "1.0")).unwrap();
        config.apply_edit(&ConfigEdit::set("ponderingEnabled", "true")).unwrap();

        let lines: Vec<&str> = config.lines().iter().map(|l| l.text()).collect();
        assert_eq!(
            lines,
            vec![
                "# Logs------",
                "logSearchInfo = true",
                "ogsChatToStderr = True",
                "",
                "# maxVisits = 500",
                "maxTime = 1.0",
                "ponderingEnabled = true",
            ]
        );
        assert_eq!(config.get("maxVisits"), None);
        assert_eq!(config.get("maxTime"), Some("1.0"));
    }

    #[test]
    fn test_missing_key_fails_fast() {
        let mut config = EngineConfig::parse(SAMPLE);
        let before = config.clone();
        let err = config
            .apply_edit(&ConfigEdit::set("numSearchThreads", "4"))
            .unwrap_err();
        assert!(matches!(err, SetupError::MissingConfigKey(ref k) if k == "numSearchThreads"));
        assert_eq!(config, before);
    }

    #[test]
    fn test_edit_serde_shape() {
        let edit: ConfigEdit =
            serde_json::from_str(r#"{"op":"set","key":"maxTime","value":"1.0"}"#).unwrap();
        assert_eq!(edit, ConfigEdit::set("maxTime", "1.0"));
        let edit: ConfigEdit = toml::from_str("op = \"disable\"\nkey = \"maxVisits\"").unwrap();
        assert_eq!(edit, ConfigEdit::disable("maxVisits"));
    }
}
