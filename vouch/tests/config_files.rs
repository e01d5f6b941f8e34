// Loading and saving vouch.json

use std::fs;

use tempfile::TempDir;
use vouch::config::CONFIG_FILE;
use vouch::{Action, ColorChoice, Config, ConfigError, Context, PathStyle};

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE);
    let config = Config {
        color: ColorChoice::Always,
        width: Some(88),
        action: Action::Continue,
        stack_trace: false,
        fold_threshold: 6,
        path_mode: PathStyle::Full,
    };

    config.save(&path).unwrap();
    assert_eq!(Config::from_file(&path).unwrap(), config);
}

#[test]
fn test_from_dir_searches_parents() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), r#"{ "width": 50, "action": "panic" }"#).unwrap();
    let nested = dir.path().join("a").join("b");
    fs::create_dir_all(&nested).unwrap();

    let config = Config::from_dir(&nested).unwrap();
    assert_eq!(config.width, Some(50));
    assert_eq!(config.action, Action::Panic);
    assert!(config.stack_trace);
}

#[test]
fn test_missing_config_is_default() {
    let dir = TempDir::new().unwrap();
    let config = Config::from_dir(dir.path()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE);

    assert!(matches!(Config::from_file(&path), Err(ConfigError::Io { .. })));

    fs::write(&path, "{ width: }").unwrap();
    let error = Config::from_file(&path).unwrap_err();
    assert!(matches!(error, ConfigError::Parse { .. }));
    assert!(error.to_string().starts_with("invalid configuration in "));
}

#[test]
fn test_context_uses_config_width() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), r#"{ "width": 42, "color": "never" }"#).unwrap();
    let config = Config::from_dir(dir.path()).unwrap();

    let options = Context::new(config).render_options();
    assert_eq!(options.width, 42);
    assert!(!options.color);
}
