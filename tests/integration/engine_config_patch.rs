use std::fs;

use ogsbot::config::BotConfig;
use ogsbot::engine_config::{self, ConfigEdit, EngineConfig, RuleSet};
use ogsbot::error::SetupError;
use tempfile::TempDir;

use crate::integration::support::GTP_CONFIG;

const FIXTURE_LINES: usize = 79;

fn write_fixture(temp: &TempDir) -> std::path::PathBuf {
    let path = temp.path().join("default_gtp.cfg");
    fs::write(&path, GTP_CONFIG).unwrap();
    path
}

fn japanese_rules() -> RuleSet {
    RuleSet {
        ko_rule: "SIMPLE".to_string(),
        scoring_rule: "TERRITORY".to_string(),
        tax_rule: "SEKI".to_string(),
        multi_stone_suicide_legal: false,
        has_button: false,
        white_handicap_bonus: "0".to_string(),
        friendly_pass_ok: None,
    }
}

#[test]
fn fixture_renders_unchanged() {
    let config = EngineConfig::parse(GTP_CONFIG);
    assert_eq!(config.line_count(), FIXTURE_LINES);
    assert_eq!(config.render(), GTP_CONFIG);
}

#[test]
fn default_edits_keep_line_count_and_set_literal_lines() {
    let temp = TempDir::new().unwrap();
    let path = write_fixture(&temp);
    let defaults = BotConfig::default();

    let report = engine_config::patch_file(&path, &defaults.engine.edits, None).unwrap();
    assert_eq!(report.lines_before, FIXTURE_LINES);
    assert_eq!(report.lines_after, FIXTURE_LINES);
    assert_eq!(report.line_delta, 0);
    assert_eq!(report.edits_applied, 5);

    let patched = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = patched.lines().collect();
    for expected in [
        "logSearchInfo = true",
        "ogsChatToStderr = True",
        "# maxVisits = 500",
        "maxTime = 1.0",
        "ponderingEnabled = true",
    ] {
        assert!(lines.contains(&expected), "missing line {expected:?}");
    }
    // untouched neighbours keep their trailing comments
    assert!(patched.contains("maxTimePondering = 60  # Maximum time to ponder"));
}

#[test]
fn rule_block_changes_line_count_by_reported_delta() {
    let temp = TempDir::new().unwrap();
    let path = write_fixture(&temp);
    let defaults = BotConfig::default();
    let rules = japanese_rules();

    let report = engine_config::patch_file(&path, &defaults.engine.edits, Some(&rules)).unwrap();
    // 28 lines from `rules =` through the last whiteHandicapBonus become 7
    assert_eq!(report.line_delta, -21);
    assert_eq!(
        report.lines_after as isize,
        report.lines_before as isize + report.line_delta
    );

    let patched = EngineConfig::parse(&fs::read_to_string(&path).unwrap());
    assert_eq!(patched.line_count(), report.lines_after);
    assert_eq!(patched.get("rules"), None);
    assert_eq!(patched.get("koRule"), Some("SIMPLE"));
    assert_eq!(patched.get("scoringRule"), Some("TERRITORY"));
    assert_eq!(patched.get("taxRule"), Some("SEKI"));
    assert_eq!(patched.get("whiteHandicapBonus"), Some("0"));
    let rendered = patched.render();
    assert!(rendered.contains("# rules = tromp-taylor\nkoRule = SIMPLE\n"));
    assert!(rendered.contains("allowResignation = true"));
}

#[test]
fn missing_key_leaves_file_untouched() {
    let temp = TempDir::new().unwrap();
    let path = write_fixture(&temp);

    let edits = vec![
        ConfigEdit::set("logSearchInfo", "true"),
        ConfigEdit::set("nnCacheSizePowerOfTwo", "20"),
    ];
    let err = engine_config::patch_file(&path, &edits, None).unwrap_err();
    match err {
        SetupError::MissingConfigKey(key) => assert_eq!(key, "nnCacheSizePowerOfTwo"),
        other => panic!("expected missing key, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), GTP_CONFIG);
}

#[test]
fn edits_from_toml_config() {
    let temp = TempDir::new().unwrap();
    let path = write_fixture(&temp);
    fs::write(
        temp.path().join("ogsbot.toml"),
        r#"
[[engine.edits]]
op = "set"
key = "numSearchThreads"
value = "2"

[[engine.edits]]
op = "disable"
key = "logDir"

[engine.rules]
ko_rule = "POSITIONAL"
scoring_rule = "AREA"
friendly_pass_ok = true
"#,
    )
    .unwrap();

    let config = ogsbot::ConfigLoader::load_for(temp.path(), None).unwrap();
    let report =
        engine_config::patch_file(&path, &config.engine.edits, config.engine.rules.as_ref())
            .unwrap();
    assert_eq!(report.edits_applied, 2);
    assert_eq!(report.line_delta, -20);

    let patched = EngineConfig::parse(&fs::read_to_string(&path).unwrap());
    assert_eq!(patched.get("numSearchThreads"), Some("2"));
    assert_eq!(patched.get("logDir"), None);
    assert_eq!(patched.get("friendlyPassOk"), Some("true"));
}
