//! Shared fixtures: a workspace config wired to an in-memory artifact source.

use flate2::write::GzEncoder;
use flate2::Compression;
use ogsbot::config::BotConfig;
use ogsbot::fetch::MemorySource;
use std::io::{Cursor, Write};
use std::path::Path;

pub const GTP_CONFIG: &str = include_str!("../fixtures/default_gtp.cfg");

pub const MODEL_BYTES: &[u8] = b"kata1 model weights, uncompressed";

/// Default config rooted at `workspace`, with an extractor that only creates the
/// library directories a real package would contain.
pub fn test_config(workspace: &Path) -> BotConfig {
    let mut config = BotConfig::default();
    config.workspace = workspace.to_path_buf();
    config.libraries.extractor = vec![
        "sh".to_string(),
        "-c".to_string(),
        "mkdir -p \"$2/usr/lib/x86_64-linux-gnu\" \"$2/lib/x86_64-linux-gnu\"".to_string(),
        "extract".to_string(),
    ];
    config
}

pub fn engine_zip() -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buf);
        let options = zip::write::FileOptions::default();
        for (name, body) in [
            ("katago", b"\x7fELF engine".as_slice()),
            ("default_gtp.cfg", GTP_CONFIG.as_bytes()),
            ("analysis_example.cfg", b"numAnalysisThreads = 2\n".as_slice()),
            ("README.txt", b"KataGo".as_slice()),
        ] {
            writer.start_file(name, options).unwrap();
            writer.write_all(body).unwrap();
        }
        writer.finish().unwrap();
    }
    buf.into_inner()
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// Serve every artifact `config` names.
pub fn full_source(config: &BotConfig) -> MemorySource {
    let source = MemorySource::new();
    for package in &config.artifacts.libraries {
        source.insert(&package.url, b"!<arch>\ndebian-binary".to_vec());
    }
    source.insert(&config.artifacts.engine.url, engine_zip());
    source.insert(&config.artifacts.model.url, gzip(MODEL_BYTES));
    source.insert(&config.artifacts.bridge.url, b"#!/bin/sh\nexit 0\n".to_vec());
    source
}
