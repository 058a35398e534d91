use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use iexpert::config::Config;

/// Config pointing at a mock completion server
#[allow(dead_code)]
pub fn config_for(server_uri: &str) -> Config {
    let mut config = Config::default();
    config.provider.api_base = server_uri.to_string();
    config.provider.api_key = Some("pplx-test-key".to_string());
    config
}

/// A well-formed chat completions response carrying `content`
#[allow(dead_code)]
pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "cmpl-1",
        "model": "llama-3.1-sonar-small-128k-online",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": { "role": "assistant", "content": content }
        }]
    })
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
