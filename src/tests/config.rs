use super::Config;
use crate::tracker::SpyMode;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let cfg = Config::load_from(&dir.path().join("lectern.toml"));

    assert_eq!(cfg.wrap_width, 100);
    assert_eq!(cfg.min_query_len, 3);
    assert_eq!(cfg.go_top_after, 12);
    assert!((cfg.focus_band - 0.6).abs() < f64::EPSILON);
    assert_eq!(cfg.spy_mode(), SpyMode::Intersection);
    assert_eq!(cfg.prefs_path, "lectern-prefs.json");
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lectern.toml");
    fs::write(&path, "wrap_width = 72\nspy_mode = \"threshold\"\n").unwrap();

    let cfg = Config::load_from(&path);
    assert_eq!(cfg.wrap_width, 72);
    assert_eq!(cfg.spy_mode(), SpyMode::ScrollThreshold);
    assert_eq!(cfg.fallback_threshold, 4);
    assert_eq!(cfg.toc_min_width, 100);
}

#[test]
fn test_unknown_spy_mode_falls_back() {
    let cfg = Config {
        spy_mode: "sideways".to_string(),
        ..Config::default()
    };
    assert_eq!(cfg.spy_mode(), SpyMode::Intersection);
}
