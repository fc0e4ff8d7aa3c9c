use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::types::AirflowConfig;
use crate::types::{DagCollection, DagTagCollection};

use super::auth::{self, Credentials};
use super::query::DagQuery;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base URL \"{0}\"")]
    BaseUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("unauthorized; check the [airflow] credentials")]
    Unauthorized,

    #[error("decoding response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A REST client for the Airflow v2 API with a TTL cache of raw responses.
///
/// Responses are cached by full request URL; `force` skips the lookup but
/// still refreshes the entry.
pub struct AirflowClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    token: Option<String>,
    cache: Cache<String, String>,
}

impl AirflowClient {
    pub fn new(config: &AirflowConfig) -> Result<Self, ApiError> {
        Self::with_credentials(config, auth::resolve_credentials(config))
    }

    pub fn with_credentials(
        config: &AirflowConfig,
        credentials: Credentials,
    ) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        if Url::parse(&base_url).is_err() {
            return Err(ApiError::BaseUrl(config.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .user_agent(concat!("dag-board/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(500)
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds.max(1)))
            .build();

        let token = match &credentials {
            Credentials::Token(t) => Some(t.clone()),
            _ => None,
        };

        Ok(Self {
            http,
            base_url,
            credentials,
            token,
            cache,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/v2/dagTags`.
    pub async fn dag_tags(
        &mut self,
        order_by: &str,
        force: bool,
    ) -> Result<DagTagCollection, ApiError> {
        self.get_json("/api/v2/dagTags", &[("order_by", order_by.to_owned())], force)
            .await
    }

    /// `GET /api/v2/dags` for one page of the list.
    pub async fn dags(&mut self, query: &DagQuery, force: bool) -> Result<DagCollection, ApiError> {
        self.get_json("/api/v2/dags", &query.to_pairs(), force).await
    }

    async fn get_json<T: DeserializeOwned>(
        &mut self,
        path: &str,
        pairs: &[(&str, String)],
        force: bool,
    ) -> Result<T, ApiError> {
        let url = self.build_url(path, pairs)?;

        if !force
            && let Some(cached) = self.cache.get(&url).await
            && let Ok(value) = serde_json::from_str::<T>(&cached)
        {
            tracing::debug!("cache hit for {url}");
            return Ok(value);
        }

        let body = self.fetch(&url).await?;
        let value = serde_json::from_str::<T>(&body)?;
        self.cache.insert(url, body).await;
        Ok(value)
    }

    async fn fetch(&mut self, url: &str) -> Result<String, ApiError> {
        self.ensure_token().await?;
        tracing::debug!(%url, "GET");

        let mut req = self.http.get(url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // A password-derived token may have expired; ask again next time.
            if matches!(self.credentials, Credentials::Password { .. }) {
                self.token = None;
            }
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_owned(),
                body,
            });
        }
        Ok(resp.text().await?)
    }

    async fn ensure_token(&mut self) -> Result<(), ApiError> {
        if self.token.is_some() {
            return Ok(());
        }
        if let Credentials::Password { username, password } = &self.credentials {
            let token = auth::request_token(&self.http, &self.base_url, username, password).await?;
            self.token = Some(token);
        }
        Ok(())
    }

    fn build_url(&self, path: &str, pairs: &[(&str, String)]) -> Result<String, ApiError> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url))
            .map_err(|_| ApiError::BaseUrl(self.base_url.clone()))?;
        if !pairs.is_empty() {
            let mut q = url.query_pairs_mut();
            for (k, v) in pairs {
                q.append_pair(k, v);
            }
        }
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> AirflowClient {
        let config = AirflowConfig {
            base_url: base_url.to_owned(),
            ..AirflowConfig::default()
        };
        AirflowClient::with_credentials(&config, Credentials::Anonymous).unwrap()
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(client("http://airflow:8080/").base_url(), "http://airflow:8080");
    }

    #[test]
    fn rejects_relative_base_url() {
        let config = AirflowConfig {
            base_url: "localhost".to_owned(),
            ..AirflowConfig::default()
        };
        assert!(matches!(
            AirflowClient::with_credentials(&config, Credentials::Anonymous),
            Err(ApiError::BaseUrl(_))
        ));
    }

    #[test]
    fn url_repeats_tag_pairs() {
        let c = client("http://airflow:8080");
        let url = c
            .build_url(
                "/api/v2/dags",
                &[("tags", "a b".to_owned()), ("tags", "c".to_owned())],
            )
            .unwrap();
        assert_eq!(url, "http://airflow:8080/api/v2/dags?tags=a+b&tags=c");
    }
}
