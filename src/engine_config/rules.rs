//! Rule-set block replacement.

use super::document::{EngineConfig, Entry, Line};
use crate::error::SetupError;
use serde::{Deserialize, Serialize};

/// Keys that make up the rules section of the engine config.
pub const RULE_KEYS: &[&str] = &[
    "rules",
    "koRule",
    "scoringRule",
    "taxRule",
    "multiStoneSuicideLegal",
    "hasButton",
    "whiteHandicapBonus",
    "friendlyPassOk",
];

/// An explicit combination of individual rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// SIMPLE, POSITIONAL or SITUATIONAL
    pub ko_rule: String,
    /// AREA or TERRITORY
    pub scoring_rule: String,
    /// NONE, SEKI or ALL
    #[serde(default = "default_tax_rule")]
    pub tax_rule: String,
    #[serde(default)]
    pub multi_stone_suicide_legal: bool,
    #[serde(default)]
    pub has_button: bool,
    /// 0, N or N-1
    #[serde(default = "default_handicap_bonus")]
    pub white_handicap_bonus: String,
    #[serde(default)]
    pub friendly_pass_ok: Option<bool>,
}

fn default_tax_rule() -> String {
    "NONE".to_string()
}

fn default_handicap_bonus() -> String {
    "0".to_string()
}

impl RuleSet {
    fn entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = vec![
            ("koRule", self.ko_rule.clone()),
            ("scoringRule", self.scoring_rule.clone()),
            ("taxRule", self.tax_rule.clone()),
            (
                "multiStoneSuicideLegal",
                self.multi_stone_suicide_legal.to_string(),
            ),
            ("hasButton", self.has_button.to_string()),
            ("whiteHandicapBonus", self.white_handicap_bonus.clone()),
        ];
        if let Some(ok) = self.friendly_pass_ok {
            entries.push(("friendlyPassOk", ok.to_string()));
        }
        entries
    }

    /// Lines that replace the rules section. The named `rules` preset is kept
    /// commented out so the individual rules take effect.
    pub fn render(&self, preset: Option<&str>) -> Vec<Line> {
        let mut lines = Vec::new();
        if let Some(preset) = preset {
            lines.push(Line::from_entry(Entry {
                key: "rules".to_string(),
                value: preset.to_string(),
                comment: None,
                enabled: false,
            }));
        }
        lines.extend(self.entries().into_iter().map(|(key, value)| {
            Line::from_entry(Entry {
                key: key.to_string(),
                value,
                comment: None,
                enabled: true,
            })
        }));
        lines
    }
}

impl EngineConfig {
    /// Replace the span from the first to the last rule-key line with `rules`
    /// rendered. The span never leaves the section holding the `rules` preset.
    /// Returns the net change in line count.
    pub fn replace_rule_block(&mut self, rules: &RuleSet) -> Result<isize, SetupError> {
        let preset_idx = self
            .find("rules")
            .ok_or_else(|| SetupError::MissingConfigKey("rules".to_string()))?;
        let preset = self.lines()[preset_idx]
            .entry()
            .map(|entry| entry.value.clone());

        let (section_start, section_end) = self.section_bounds(preset_idx);
        let rule_lines: Vec<usize> = (section_start..section_end)
            .filter(|&idx| {
                self.lines()[idx]
                    .entry()
                    .map(|entry| RULE_KEYS.contains(&entry.key.as_str()))
                    .unwrap_or(false)
            })
            .collect();
        // preset_idx is in rule_lines, so both ends exist
        let first = rule_lines.first().copied().unwrap_or(preset_idx);
        let last = rule_lines.last().copied().unwrap_or(preset_idx);

        let replacement = rules.render(preset.as_deref());
        let removed = last - first + 1;
        let delta = replacement.len() as isize - removed as isize;
        self.splice(first..=last, replacement);
        Ok(delta)
    }

    /// Half-open line range of the section around `idx`, bounded by the
    /// `# Name-----` header lines on either side.
    fn section_bounds(&self, idx: usize) -> (usize, usize) {
        let lines = self.lines();
        let start = lines[..idx]
            .iter()
            .rposition(Line::is_section_header)
            .map_or(0, |pos| pos + 1);
        let end = lines[idx..]
            .iter()
            .position(Line::is_section_header)
            .map_or(lines.len(), |pos| idx + pos);
        (start, end)
    }
}
