use std::fs;

use ogsbot::tooling::cli::{CliContext, Commands};
use tempfile::TempDir;

#[test]
fn policy_command_writes_documented_keys() {
    let temp = TempDir::new().unwrap();
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();

    cli.execute(&Commands::Policy { stdout: false }).unwrap();

    let text = fs::read_to_string(temp.path().join("kata_speed.json5")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    let keys: Vec<&str> = parsed
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), 12);
    assert!(parsed.get("blacklist").and_then(|v| v.as_array()).is_some());
    assert!(parsed.get("whitelist").and_then(|v| v.as_array()).is_some());
    assert_eq!(
        parsed.get("allowed_board_sizes"),
        Some(&serde_json::json!([9, 13, 19]))
    );
    assert!(parsed["allowed_correspondence_settings"].is_null());
    assert!(parsed["bot"].get("send_pv_data").is_some());
}

#[test]
fn status_json_contract_has_required_fields() {
    let temp = TempDir::new().unwrap();
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();

    let output = cli
        .execute(&Commands::Status {
            format: "json".to_string(),
        })
        .unwrap();
    assert_eq!(output.exit_code, 0);

    let parsed: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    assert!(parsed.get("workspace").and_then(|v| v.as_str()).is_some());
    let artifacts = parsed.get("artifacts").and_then(|v| v.as_array()).unwrap();
    let names: Vec<&str> = artifacts
        .iter()
        .filter_map(|a| a.get("name").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(
        names,
        vec!["engine", "engine_config", "model", "bridge", "policy"]
    );
    for artifact in artifacts {
        assert_eq!(artifact.get("present"), Some(&serde_json::json!(false)));
        assert!(artifact.get("modified").unwrap().is_null());
    }
    assert_eq!(
        parsed
            .get("library_dirs")
            .and_then(|v| v.as_array())
            .map(Vec::len),
        Some(2)
    );
    assert!(!parsed["engine_dir_problems"].as_array().unwrap().is_empty());
}

#[test]
fn workspace_config_file_is_honoured() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("ogsbot.toml"),
        "[launch]\npolicy_file = \"bot_policy.json\"\n\n[policy]\nmax_games_per_player = 3\n",
    )
    .unwrap();
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();

    cli.execute(&Commands::Policy { stdout: false }).unwrap();
    let text = fs::read_to_string(temp.path().join("bot_policy.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["max_games_per_player"], 3);
}

#[test]
fn explicit_config_file_replaces_workspace_file() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("ogsbot.toml"),
        "[policy]\nmax_games_per_player = 3\n",
    )
    .unwrap();
    let explicit = temp.path().join("other.toml");
    fs::write(&explicit, "[policy]\nhidden = true\n").unwrap();

    let cli = CliContext::new(temp.path().to_path_buf(), Some(explicit)).unwrap();
    let output = cli.execute(&Commands::Policy { stdout: true }).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(parsed["hidden"], true);
    assert_eq!(parsed["max_games_per_player"], 1);
}
