use std::path::Path;

use dag_board::color::Color;
use dag_board::config::loader::{load_config, merge_local};
use dag_board::config::types::AppConfig;

#[test]
fn empty_config_uses_defaults() {
    let config: AppConfig = toml::from_str("").unwrap();
    assert_eq!(config.airflow.base_url, "http://localhost:8080");
    assert_eq!(config.airflow.cache_ttl_seconds, 30);
    assert_eq!(config.defaults.page_size, 50);
    assert_eq!(config.defaults.date_format, "relative");
    assert_eq!(config.search_params.last_dag_run_state, "last_dag_run_state");
    assert_eq!(config.search_params.tags, "tags");
}

#[test]
fn parse_unknown_keys_ignored() {
    let toml = r#"
unknown_top_level = "should be ignored"

[airflow]
base_url = "https://airflow.example.com"
"#;
    let config: AppConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.airflow.base_url, "https://airflow.example.com");
}

#[test]
fn parse_partial_tables_keep_field_defaults() {
    let toml = r#"
[defaults]
page_size = 25

[search_params]
paused = "is_paused"
"#;
    let config: AppConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.defaults.page_size, 25);
    assert_eq!(config.defaults.history_limit, 100);
    assert_eq!(config.search_params.paused, "is_paused");
    assert_eq!(config.search_params.offset, "offset");
}

#[test]
fn parse_theme_colors() {
    let toml = r##"
[theme.colors.text]
primary = "7"
accent = "#ff8800"

[theme.colors.background]
selected = "dark_gray"
"##;
    let config: AppConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.theme.colors.text.primary, Some(Color::Ansi(7)));
    assert_eq!(
        config.theme.colors.text.accent,
        Some(Color::Rgb {
            r: 0xff,
            g: 0x88,
            b: 0x00
        })
    );
    assert_eq!(config.theme.colors.background.selected, Some(Color::Ansi(8)));
}

#[test]
fn invalid_color_is_an_error() {
    let toml = r#"
[theme.colors.text]
primary = "not-a-colour"
"#;
    assert!(toml::from_str::<AppConfig>(toml).is_err());
}

#[test]
fn load_config_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[airflow]
base_url = "http://airflow:8080"
timeout_seconds = 3

[defaults]
initial_query = "paused=false"
"#,
    )
    .unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.airflow.base_url, "http://airflow:8080");
    assert_eq!(config.airflow.timeout_seconds, 3);
    assert_eq!(config.defaults.initial_query, "paused=false");
}

#[test]
fn load_config_missing_file_is_an_error() {
    let err = load_config(Some(Path::new("/nonexistent/dag-board.toml"))).unwrap_err();
    assert!(err.to_string().contains("reading"));
}

#[test]
fn local_tables_replace_global_ones() {
    let global: AppConfig = toml::from_str(
        r#"
[airflow]
base_url = "http://global:8080"

[defaults]
page_size = 10
"#,
    )
    .unwrap();

    let merged = merge_local(
        global,
        r#"
[defaults]
page_size = 20
"#,
    )
    .unwrap();

    assert_eq!(merged.airflow.base_url, "http://global:8080");
    assert_eq!(merged.defaults.page_size, 20);
}

#[test]
fn local_with_invalid_toml_is_an_error() {
    assert!(merge_local(AppConfig::default(), "[defaults\n").is_err());
}
