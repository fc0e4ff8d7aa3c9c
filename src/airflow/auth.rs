use serde::{Deserialize, Serialize};

use crate::config::types::AirflowConfig;

use super::client::ApiError;

/// How requests to the API are authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    /// Exchanged for a token at `POST /auth/token` on first use.
    Password { username: String, password: String },
    Anonymous,
}

/// Resolve credentials from the config and the process environment.
///
/// Priority:
/// 1. `AIRFLOW_TOKEN` environment variable
/// 2. `[airflow] token`
/// 3. `[airflow] username` with `AIRFLOW_PASSWORD` or `[airflow] password`
pub fn resolve_credentials(config: &AirflowConfig) -> Credentials {
    resolve_credentials_from(
        config,
        std::env::var("AIRFLOW_TOKEN").ok(),
        std::env::var("AIRFLOW_PASSWORD").ok(),
    )
}

pub fn resolve_credentials_from(
    config: &AirflowConfig,
    env_token: Option<String>,
    env_password: Option<String>,
) -> Credentials {
    if let Some(token) = env_token.filter(|t| !t.is_empty()) {
        return Credentials::Token(token);
    }
    if let Some(token) = config.token.clone().filter(|t| !t.is_empty()) {
        return Credentials::Token(token);
    }
    if let Some(username) = config.username.clone().filter(|u| !u.is_empty()) {
        let password = env_password
            .filter(|p| !p.is_empty())
            .or_else(|| config.password.clone())
            .unwrap_or_default();
        return Credentials::Password { username, password };
    }
    Credentials::Anonymous
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchange a username and password for a bearer token.
pub(crate) async fn request_token(
    http: &reqwest::Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<String, ApiError> {
    let url = format!("{base_url}/auth/token");
    tracing::debug!(%url, %username, "requesting access token");
    let resp = http
        .post(&url)
        .json(&TokenRequest { username, password })
        .send()
        .await?;

    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            url,
            body,
        });
    }

    let body = resp.text().await?;
    let token: TokenResponse = serde_json::from_str(&body)?;
    Ok(token.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AirflowConfig {
        AirflowConfig::default()
    }

    #[test]
    fn env_token_wins() {
        let mut cfg = config();
        cfg.token = Some("from-config".to_owned());
        let creds = resolve_credentials_from(&cfg, Some("from-env".to_owned()), None);
        assert_eq!(creds, Credentials::Token("from-env".to_owned()));
    }

    #[test]
    fn empty_env_token_is_ignored() {
        let mut cfg = config();
        cfg.token = Some("from-config".to_owned());
        let creds = resolve_credentials_from(&cfg, Some(String::new()), None);
        assert_eq!(creds, Credentials::Token("from-config".to_owned()));
    }

    #[test]
    fn env_password_overrides_config_password() {
        let mut cfg = config();
        cfg.username = Some("admin".to_owned());
        cfg.password = Some("config-pw".to_owned());
        let creds = resolve_credentials_from(&cfg, None, Some("env-pw".to_owned()));
        assert_eq!(
            creds,
            Credentials::Password {
                username: "admin".to_owned(),
                password: "env-pw".to_owned(),
            }
        );
    }

    #[test]
    fn nothing_configured_is_anonymous() {
        assert_eq!(
            resolve_credentials_from(&config(), None, None),
            Credentials::Anonymous
        );
    }
}
