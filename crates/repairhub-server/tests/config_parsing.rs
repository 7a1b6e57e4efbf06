use std::{env, fs};

use repairhub_server::config::loader::load_config;

// Single test: the checks below mutate process environment variables.
#[test]
fn config_parsing_and_env_overrides_and_validation() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("repairhub.toml");

    let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8081

[upstream]
base_url = "http://api.internal:3000"
timeout_secs = 5

[graphql]
max_depth = 8
introspection = false
playground = false

[cors]
allowed_origins = ["https://admin.example.com"]

[logging]
level = "debug"
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses, unspecified keys keep defaults
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.upstream.base_url, "http://api.internal:3000");
    assert_eq!(cfg.upstream.timeout_secs, 5);
    assert_eq!(cfg.graphql.max_depth, 8);
    assert_eq!(cfg.graphql.max_complexity, 500);
    assert!(!cfg.graphql.introspection);
    assert!(!cfg.graphql.playground);
    assert_eq!(cfg.cors.allowed_origins, vec!["https://admin.example.com"]);
    assert_eq!(cfg.logging.level.to_ascii_lowercase(), "debug");

    // 2) Env override should win over file
    unsafe {
        env::set_var("REPAIRHUB__SERVER__PORT", "9090");
        env::set_var("REPAIRHUB__UPSTREAM__TIMEOUT_SECS", "30");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.server.port, 9090);
    assert_eq!(cfg_env.upstream.timeout_secs, 30);
    unsafe {
        env::remove_var("REPAIRHUB__SERVER__PORT");
        env::remove_var("REPAIRHUB__UPSTREAM__TIMEOUT_SECS");
    }

    // 3) Legacy upstream variable replaces the configured base URL
    unsafe {
        env::set_var("NEST_API_URL", "http://nest:4000");
    }
    let cfg_legacy = load_config(path.to_str()).expect("should parse config with legacy url");
    assert_eq!(cfg_legacy.upstream.base_url, "http://nest:4000");
    unsafe {
        env::remove_var("NEST_API_URL");
    }

    // 4) Missing file falls back to defaults
    let missing = dir.path().join("missing.toml");
    let cfg_default = load_config(missing.to_str()).expect("defaults should be valid");
    assert_eq!(cfg_default.server.port, 8000);
    assert_eq!(cfg_default.upstream.base_url, "http://localhost:3000");
    assert_eq!(cfg_default.upstream.timeout_secs, 10);

    // 5) Invalid upstream URL should error
    let invalid_path = dir.path().join("invalid.toml");
    let invalid_toml = r#"
[upstream]
base_url = "ftp://files.example.com"
"#;
    fs::write(&invalid_path, invalid_toml).expect("write invalid toml");
    let err = load_config(invalid_path.to_str()).expect_err("expected validation error");
    assert!(err.contains("upstream.base_url"));

    // 6) Zero timeout should error
    let zero_timeout_path = dir.path().join("zero.toml");
    fs::write(&zero_timeout_path, "[upstream]\ntimeout_secs = 0\n").expect("write toml");
    let err = load_config(zero_timeout_path.to_str()).expect_err("expected validation error");
    assert!(err.contains("timeout_secs"));
}
