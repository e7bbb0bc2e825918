use std::fs;
use std::time::{Duration, Instant};

use ogsbot::error::SetupError;
use ogsbot::install::is_executable;
use ogsbot::policy::BotPolicy;
use ogsbot::workflow::{self, Workflow};
use tempfile::TempDir;

use crate::integration::support::{full_source, test_config, MODEL_BYTES};

#[cfg(unix)]
#[test]
fn install_produces_complete_workspace() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path());
    let source = full_source(&config);

    let workflow = Workflow::new(config, &source).unwrap();
    let report = workflow.install().unwrap();
    let layout = workflow.layout();

    assert_eq!(report.model_bytes, MODEL_BYTES.len() as u64);
    assert_eq!(fs::read(&layout.model_file).unwrap(), MODEL_BYTES);
    assert!(is_executable(&layout.engine_binary));
    assert!(is_executable(&layout.bridge_binary));
    assert_eq!(report.library_path.dirs(), layout.library_search_dirs.as_slice());
    assert_eq!(report.patch.line_delta, 0);

    // archives are transient
    let leftovers: Vec<String> = fs::read_dir(&layout.workspace)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".deb") || name.ends_with(".zip") || name.ends_with(".gz"))
        .collect();
    assert!(leftovers.is_empty(), "left behind: {:?}", leftovers);

    let status = workflow::status(workflow.config());
    assert!(
        status.engine_dir_problems.is_empty(),
        "{:?}",
        status.engine_dir_problems
    );
    assert!(status.is_complete());

    let policy: BotPolicy =
        serde_json::from_str(&fs::read_to_string(&layout.policy_file).unwrap()).unwrap();
    assert_eq!(policy.allowed_board_sizes, vec![9, 13, 19]);
    assert_eq!(policy.allowed_correspondence_settings, None);
}

#[cfg(unix)]
#[test]
fn install_twice_overwrites_everything() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path());
    let source = full_source(&config);
    let workflow = Workflow::new(config, &source).unwrap();

    workflow.install().unwrap();
    let first = fs::read_to_string(&workflow.layout().engine_config).unwrap();
    workflow.install().unwrap();
    let second = fs::read_to_string(&workflow.layout().engine_config).unwrap();

    assert_eq!(first, second);
    // libraries, engine, model and bridge are fetched again on every run
    let per_run = 3 + workflow.config().artifacts.libraries.len();
    assert_eq!(source.requests().len(), per_run * 2);
}

#[cfg(unix)]
#[test]
fn unreachable_url_aborts_before_launch() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(temp.path());
    config.launch.api_key = Some("secret".to_string());
    let source = full_source(&config);
    config.artifacts.model.url = "http://127.0.0.1:9/model.bin.gz".to_string();

    let workflow = Workflow::new(config, &source).unwrap();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let err = workflow.run(runtime.handle()).unwrap_err();

    assert!(matches!(err, SetupError::HttpStatus { status: 404, .. }));
    let requested = source.requests();
    assert_eq!(requested.last().unwrap(), "http://127.0.0.1:9/model.bin.gz");
    assert!(!requested
        .iter()
        .any(|url| url == &workflow.config().artifacts.bridge.url));
    assert!(!workflow.layout().policy_file.exists());
}

#[cfg(unix)]
#[test]
fn run_launches_bridge_with_scoped_library_path() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(temp.path());
    config.launch.api_key = Some("secret".to_string());
    let source = full_source(&config);
    // records its argv and library path, then exits 7
    source.insert(
        &config.artifacts.bridge.url,
        b"#!/bin/sh\necho \"$@\" > argv.txt\necho \"$LD_LIBRARY_PATH\" > libpath.txt\nexit 7\n"
            .to_vec(),
    );

    let workflow = Workflow::new(config, &source).unwrap();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let status = workflow.run(runtime.handle()).unwrap();
    assert_eq!(ogsbot::launch::exit_code(status), 7);

    let root = &workflow.layout().workspace;
    let argv = fs::read_to_string(root.join("argv.txt")).unwrap();
    assert!(argv.starts_with(
        "--apikey secret --config kata_speed.json5 -- katago/katago gtp -config katago/default_gtp.cfg"
    ));
    let libpath = fs::read_to_string(root.join("libpath.txt")).unwrap();
    assert!(libpath.starts_with(&format!(
        "{}/libs/usr/lib/x86_64-linux-gnu:",
        root.display()
    )));
}

#[test]
fn corrupt_model_is_extract_error() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(temp.path());
    config.artifacts.libraries.clear();
    config.libraries.search_dirs = vec![".".into()];
    let source = full_source(&config);
    source.insert(&config.artifacts.model.url, b"not gzip at all".to_vec());

    let workflow = Workflow::new(config, &source).unwrap();
    let err = workflow.install().unwrap_err();
    assert!(matches!(err, SetupError::Extract(_)));
    assert!(!workflow.layout().model_file.exists());
}

#[test]
fn pinned_checksum_mismatch_is_integrity_error() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(temp.path());
    config.artifacts.libraries.clear();
    config.libraries.search_dirs = vec![".".into()];
    config.artifacts.engine.checksum = Some(format!("sha256:{}", "00".repeat(32)));
    let source = full_source(&config);

    let workflow = Workflow::new(config, &source).unwrap();
    let err = workflow.install().unwrap_err();
    assert!(matches!(err, SetupError::Integrity { .. }));
    // the unverified archive is gone and nothing was extracted
    assert!(!workflow.layout().engine_binary.exists());
    assert!(!workflow
        .layout()
        .staging_path(&workflow.config().artifacts.engine.file_name)
        .exists());
}

#[cfg(unix)]
#[test]
fn run_with_monitor_returns_bridge_exit_promptly() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(temp.path());
    config.launch.api_key = Some("secret".to_string());
    config.monitor.enabled = true;
    config.monitor.interval_ms = 50;
    let source = full_source(&config);
    source.insert(
        &config.artifacts.bridge.url,
        b"#!/bin/sh\nsleep 0.3\nexit 7\n".to_vec(),
    );

    let workflow = Workflow::new(config, &source).unwrap();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let started = Instant::now();
    let status = workflow.run(runtime.handle()).unwrap();

    assert_eq!(ogsbot::launch::exit_code(status), 7);
    assert!(
        started.elapsed() < Duration::from_secs(10),
        "run took {:?}",
        started.elapsed()
    );
}

#[cfg(unix)]
#[test]
fn install_failure_with_monitor_still_returns_error() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(temp.path());
    config.launch.api_key = Some("secret".to_string());
    config.monitor.enabled = true;
    config.monitor.interval_ms = 50;
    let source = full_source(&config);
    source.insert(&config.artifacts.model.url, b"not gzip at all".to_vec());

    let workflow = Workflow::new(config, &source).unwrap();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let err = workflow.run(runtime.handle()).unwrap_err();

    assert!(matches!(err, SetupError::Extract(_)));
    assert!(!workflow.layout().policy_file.exists());
}
