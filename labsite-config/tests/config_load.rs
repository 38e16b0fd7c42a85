use labsite_common::observability::LogFormat;
use labsite_config::LabsiteConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn file_values_load() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "labsite.yaml",
        r#"
achievements_path: data/achievements.json
news_dir: content/news
co_author: "Lab et al."
http:
  timeout_secs: 4
  user_agent: "test-agent/0.1"
log:
  format: json
  emit_stderr: true
"#,
    );

    let config = LabsiteConfigLoader::new()
        .with_file(p)
        .load()
        .expect("load config");

    assert_eq!(config.achievements_path, PathBuf::from("data/achievements.json"));
    assert_eq!(config.news_dir, PathBuf::from("content/news"));
    assert_eq!(config.co_author, "Lab et al.");
    assert_eq!(config.http.timeout_secs, 4);
    assert_eq!(config.http.user_agent, "test-agent/0.1");
    assert_eq!(config.log.format, LogFormat::Json);
    assert!(config.log.emit_stderr);
    assert_eq!(config.id_prefix, "achievement");
}

#[test]
#[serial]
fn env_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "labsite.yaml", "http:\n  timeout_secs: 4\n");

    temp_env::with_var("LABSITE__HTTP__TIMEOUT_SECS", Some("30"), || {
        let config = LabsiteConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config");
        assert_eq!(config.http.timeout_secs, 30);
    });
}

#[test]
#[serial]
fn optional_file_may_be_absent() {
    let tmp = TempDir::new().unwrap();
    let config = LabsiteConfigLoader::new()
        .with_optional_file(tmp.path().join("missing.yaml"))
        .load()
        .expect("defaults");
    assert_eq!(config.news_dir, PathBuf::from("src/content/news"));
}

#[test]
#[serial]
fn required_file_must_exist() {
    let tmp = TempDir::new().unwrap();
    let result = LabsiteConfigLoader::new()
        .with_file(tmp.path().join("missing.yaml"))
        .load();
    assert!(result.is_err());
}
