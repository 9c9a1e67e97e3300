use std::collections::HashMap;
use swing_pivot::config::EngineConfig;
use swing_pivot::config_loader::{ConfigError, ConfigFormat, ConfigLoader};
use tempfile::tempdir;

#[test]
fn test_partial_json_uses_defaults() {
    let json = r#"{"max_pivots": 10, "use_market_bias": false}"#;
    let config = ConfigLoader::load_from_string::<EngineConfig>(json, ConfigFormat::Json).unwrap();

    assert_eq!(config.max_pivots, 10);
    assert!(!config.use_market_bias);
    assert_eq!(config.min_price_change, 0.004);
    assert_eq!(config.bar_minutes, 30);
}

#[test]
fn test_toml_string() {
    let toml_str = r#"
        min_price_change = 0.01
        confirmation_candles = 3
    "#;
    let config =
        ConfigLoader::load_from_string::<EngineConfig>(toml_str, ConfigFormat::Auto).unwrap();

    assert_eq!(config.min_price_change, 0.01);
    assert_eq!(config.confirmation_candles, 3);
    assert_eq!(config.required_counter_moves, 2);
}

#[test]
fn test_validation_error() {
    let json = r#"{"required_counter_moves": 3}"#;
    let result = ConfigLoader::load_from_string::<EngineConfig>(json, ConfigFormat::Json);
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));

    let json = r#"{"bar_minutes": 7}"#;
    let result = ConfigLoader::load_from_string::<EngineConfig>(json, ConfigFormat::Json);
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_parse_error() {
    let result = ConfigLoader::load_from_string::<EngineConfig>("{not json", ConfigFormat::Json);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_save_and_load_file() {
    let dir = tempdir().unwrap();
    let config = EngineConfig {
        max_pivots: 12,
        sr_lookback: 30,
        ..Default::default()
    };

    let mut loaded = HashMap::new();
    for name in ["engine.json", "engine.toml"] {
        let path = dir.path().join(name);
        ConfigLoader::save_to_file(&config, &path, ConfigFormat::Auto).unwrap();
        let config =
            ConfigLoader::load_from_file::<EngineConfig>(&path, ConfigFormat::Auto).unwrap();
        loaded.insert(name, config);
    }

    assert_eq!(loaded["engine.json"], config);
    assert_eq!(loaded["engine.toml"], config);
}

#[test]
fn test_unknown_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("engine.yaml");
    std::fs::write(&path, "max_pivots: 3").unwrap();

    let result = ConfigLoader::load_from_file::<EngineConfig>(&path, ConfigFormat::Auto);
    assert!(matches!(result, Err(ConfigError::FileError(_))));
}
