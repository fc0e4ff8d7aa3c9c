use serde::Deserialize;

use crate::color::Color;

// ---------------------------------------------------------------------------
// Custom Color deserialization
// ---------------------------------------------------------------------------

/// Deserialize an `Option<Color>` from a TOML string value.
pub(crate) mod color_de {
    use serde::{self, Deserialize, Deserializer};

    use crate::color::Color;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        s.map(|s| Color::parse(&s, "<theme>"))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub airflow: AirflowConfig,
    pub defaults: Defaults,
    pub search_params: SearchParamKeys,
    pub theme: Theme,
}

// ---------------------------------------------------------------------------
// Airflow connection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AirflowConfig {
    /// Root of the Airflow webserver, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Bearer token. `AIRFLOW_TOKEN` takes precedence.
    pub token: Option<String>,
    /// When set (and no token is available), a token is requested from
    /// `/auth/token` with these credentials.
    pub username: Option<String>,
    pub password: Option<String>,
    pub cache_ttl_seconds: u64,
    pub timeout_seconds: u64,
}

impl Default for AirflowConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_owned(),
            token: None,
            username: None,
            password: None,
            cache_ttl_seconds: 30,
            timeout_seconds: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Rows per page when the `limit` parameter is absent.
    pub page_size: usize,
    pub date_format: String,
    /// Query string the console opens with, e.g. `"paused=false"`.
    pub initial_query: String,
    /// Maximum number of entries kept in the navigation history.
    pub history_limit: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            page_size: 50,
            date_format: "relative".to_owned(),
            initial_query: String::new(),
            history_limit: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// Query parameter names
// ---------------------------------------------------------------------------

/// Names of the query parameters the console reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchParamKeys {
    pub last_dag_run_state: String,
    pub paused: String,
    pub tags: String,
    pub offset: String,
    pub limit: String,
    pub sort: String,
    pub name_pattern: String,
}

impl Default for SearchParamKeys {
    fn default() -> Self {
        Self {
            last_dag_run_state: "last_dag_run_state".to_owned(),
            paused: "paused".to_owned(),
            tags: "tags".to_owned(),
            offset: "offset".to_owned(),
            limit: "limit".to_owned(),
            sort: "sort".to_owned(),
            name_pattern: "name_pattern".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub colors: ColorsTheme,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColorsTheme {
    pub text: TextColors,
    pub background: BgColors,
    pub border: BorderColors,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextColors {
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub primary: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub secondary: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub faint: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub accent: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub warning: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub success: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub error: Option<Color>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BgColors {
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub selected: Option<Color>,
    /// Background of the active quick-filter button.
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub active: Option<Color>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BorderColors {
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub primary: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub faint: Option<Color>,
}
