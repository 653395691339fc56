mod common;

use common::TestWorkspace;
use gittycat::config::{create_default_if_missing, parse_pattern_list};
use gittycat::{load_config_from, save_config_to, AppConfig, RepoConfig, SyncConfiguration};

/// Test that a saved repository list survives a reload unchanged
#[test]
fn test_save_config_persists_repositories() {
    let ws = TestWorkspace::new();

    let mut config = load_config_from(&ws.config_path).expect("Failed to load config");
    let mut art = RepoConfig::new("art", "~/Art", "git@example.com:me/art.git");
    art.lfs_patterns = parse_pattern_list("*.psd, *.kra");
    config.repos.push(art);
    config
        .repos
        .push(RepoConfig::new("notes", "~/Notes", "git@example.com:me/notes.git"));

    save_config_to(&config, &ws.config_path).expect("Failed to save config");

    let reloaded = load_config_from(&ws.config_path).expect("Failed to reload config");
    assert_eq!(reloaded, config);
    assert_eq!(reloaded.repos[0].lfs_patterns, vec!["*.psd", "*.kra"]);
}

/// Test that saving preserves the scalar settings
#[test]
fn test_save_config_preserves_other_fields() {
    let ws = TestWorkspace::new();

    let config = AppConfig {
        interval_minutes: 45,
        commit_message: "backup".to_string(),
        allow_dirty_worktrees: true,
        ..AppConfig::default()
    };
    save_config_to(&config, &ws.config_path).expect("Failed to save config");

    let reloaded = load_config_from(&ws.config_path).expect("Failed to reload config");
    assert_eq!(reloaded.interval_minutes, 45);
    assert_eq!(reloaded.commit_message, "backup");
    assert!(reloaded.allow_dirty_worktrees);
}

/// Test that the written file uses the documented camelCase keys
#[test]
fn test_written_file_uses_documented_keys() {
    let ws = TestWorkspace::new();
    assert!(create_default_if_missing(&ws.config_path).expect("Failed to create config"));

    let raw = std::fs::read_to_string(&ws.config_path).expect("Failed to read config");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("config is JSON");
    assert_eq!(json["intervalMinutes"], 15);
    assert_eq!(json["repos"], serde_json::json!([]));
    assert_eq!(json["commitMessage"], "chore(sync): automatic backup");
    assert_eq!(json["allowDirtyWorktrees"], false);
}

/// Test that a hand-written file with only some keys loads with defaults
#[test]
fn test_partial_file_uses_defaults() {
    let ws = TestWorkspace::new();
    std::fs::write(
        &ws.config_path,
        r#"{"repos":[{"name":"notes","path":"/srv/notes","remote":"url"}]}"#,
    )
    .expect("Failed to write config");

    let config = load_config_from(&ws.config_path).expect("Failed to load config");
    let runtime = SyncConfiguration::from(&config);

    assert_eq!(runtime.interval_seconds, 15 * 60);
    assert_eq!(runtime.repositories[0].branch, "main");
    assert!(runtime.repositories[0].large_file_patterns.is_empty());
}

/// Test that validation errors surface on load
#[test]
fn test_out_of_range_interval_is_rejected_on_load() {
    let ws = TestWorkspace::new();
    std::fs::write(&ws.config_path, r#"{"intervalMinutes": 0}"#).expect("Failed to write config");

    let err = load_config_from(&ws.config_path).expect_err("interval 0 should be rejected");
    assert!(err.to_string().contains("intervalMinutes"));
}

/// Test that one unparsable large-file pattern does not drop any repository
#[test]
fn test_bad_lfs_pattern_does_not_block_load() {
    let ws = TestWorkspace::new();
    std::fs::write(
        &ws.config_path,
        r#"{"repos":[
            {"name":"a","path":"/srv/a","remote":"url"},
            {"name":"b","path":"/srv/b","remote":"url","lfsPatterns":["*.pdf","[abc"]}
        ]}"#,
    )
    .expect("Failed to write config");

    let config = load_config_from(&ws.config_path).expect("Failed to load config");
    let runtime = SyncConfiguration::from(&config);

    assert_eq!(runtime.repositories.len(), 2);
    assert_eq!(runtime.repositories[1].large_file_patterns, vec!["*.pdf", "[abc"]);
}

/// Test that keys this version does not interpret survive a save
#[test]
fn test_ignore_file_round_trips() {
    let ws = TestWorkspace::new();
    std::fs::write(
        &ws.config_path,
        r#"{"repos":[{"name":"notes","path":"/srv/notes","remote":"url","ignoreFile":".syncignore"}]}"#,
    )
    .expect("Failed to write config");

    let config = load_config_from(&ws.config_path).expect("Failed to load config");
    save_config_to(&config, &ws.config_path).expect("Failed to save config");

    let raw = std::fs::read_to_string(&ws.config_path).expect("Failed to read config");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("config is JSON");
    assert_eq!(json["repos"][0]["ignoreFile"], ".syncignore");
}
