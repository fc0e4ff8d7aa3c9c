use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::types::AppConfig;

/// Discover and load the app config.
///
/// Priority:
/// 1. `--config` flag (explicit path)
/// 2. `.dag-board.toml` in the current directory or a parent, up to the Git root
/// 3. `$DAG_BOARD_CONFIG` environment variable
/// 4. `$XDG_CONFIG_HOME/dag-board/config.toml`
/// 5. `~/.config/dag-board/config.toml`
///
/// When both a global and a project-local config exist, the local tables
/// that are present replace their global counterparts wholesale.
pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit_path {
        return read_config(path);
    }

    let global_path = find_global_config();
    let local_path = find_project_config();

    let config = match (global_path, local_path) {
        (Some(global), Some(local)) => {
            let global_cfg = read_config(&global)?;
            let local_src = std::fs::read_to_string(&local)
                .with_context(|| format!("reading {}", local.display()))?;
            merge_local(global_cfg, &local_src)
                .with_context(|| format!("parsing TOML from {}", local.display()))?
        }
        (Some(path), None) | (None, Some(path)) => read_config(&path)?,
        (None, None) => AppConfig::default(),
    };

    tracing::debug!(
        base_url = %config.airflow.base_url,
        page_size = config.defaults.page_size,
        "config loaded"
    );
    Ok(config)
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parsing TOML from {}", path.display()))
}

/// Overlay a project-local config on top of the global one.
///
/// Only tables that appear in the local file replace the global ones, so a
/// local file may contain nothing but `[search_params]`.
pub fn merge_local(global: AppConfig, local_src: &str) -> Result<AppConfig> {
    let table: toml::Table = toml::from_str(local_src)?;
    let local: AppConfig = toml::from_str(local_src)?;
    Ok(AppConfig {
        airflow: if table.contains_key("airflow") {
            local.airflow
        } else {
            global.airflow
        },
        defaults: if table.contains_key("defaults") {
            local.defaults
        } else {
            global.defaults
        },
        search_params: if table.contains_key("search_params") {
            local.search_params
        } else {
            global.search_params
        },
        theme: if table.contains_key("theme") {
            local.theme
        } else {
            global.theme
        },
    })
}

fn find_project_config() -> Option<PathBuf> {
    // Walk up from CWD looking for `.dag-board.toml`, stopping at the Git root.
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(".dag-board.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").exists() || !dir.pop() {
            return None;
        }
    }
}

fn find_global_config() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("DAG_BOARD_CONFIG") {
        let p = PathBuf::from(path);
        if p.is_file() {
            return Some(p);
        }
    }

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        let p = PathBuf::from(xdg).join("dag-board/config.toml");
        if p.is_file() {
            return Some(p);
        }
    }

    let home = std::env::var("HOME").ok().map(PathBuf::from)?;
    let p = home.join(".config/dag-board/config.toml");
    p.is_file().then_some(p)
}
