use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use tui_times::config::{ConfigError, QuizConfig};

#[test]
fn config_loads_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tui-times.toml");
    fs::write(
        &path,
        r#"
[round]
feedback_ms = 800

[storage]
data_dir = "/var/lib/quiz"

[logging]
filter = "tui_times=debug"
"#,
    )
    .unwrap();

    let config = QuizConfig::from_file(&path).unwrap();
    assert_eq!(config.round.feedback_ms, 800);
    assert_eq!(config.round.tick_ms, 16);
    assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/quiz"));
    assert_eq!(config.scores_path(), PathBuf::from("/var/lib/quiz/scores.json"));
    assert_eq!(config.logging.filter, "tui_times=debug");
    assert_eq!(config.round_config().feedback_ms, 800);
}

#[test]
fn config_reports_missing_file() {
    let dir = tempdir().unwrap();
    let err = QuizConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn config_reports_bad_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[round\nfeedback_ms = ").unwrap();
    let err = QuizConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn config_rejects_out_of_range_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("slow.toml");
    fs::write(&path, "[round]\nfeedback_ms = 60000\n").unwrap();
    let err = QuizConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "round.feedback_ms", .. }));
}

#[test]
fn config_player_can_be_cleared() {
    let mut config = QuizConfig::default();
    config.set_player("  ada  ");
    assert_eq!(config.player.name.as_deref(), Some("ada"));
    config.set_player("");
    assert_eq!(config.player.name, None);
    config.validate().unwrap();
}
