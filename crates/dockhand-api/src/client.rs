use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::records::{App, AttachedDyno, ConfigVars, Formation, Release, Slug};

const V3_ACCEPT: &str = "application/vnd.heroku+json; version=3";

/// Abstraction over the platform API for testability.
///
/// Production code uses [`ApiClient`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait PlatformApi: Send + Sync {
    async fn get_app(&self, app: &str) -> Result<App, ApiError>;

    async fn get_releases(&self, app: &str) -> Result<Vec<Release>, ApiError>;

    async fn get_slug(&self, app: &str, slug_id: &str) -> Result<Slug, ApiError>;

    async fn get_formation(&self, app: &str) -> Result<Vec<Formation>, ApiError>;

    async fn get_config_vars(&self, app: &str) -> Result<ConfigVars, ApiError>;

    /// Start a one-off attached process running `env`, returning the
    /// rendezvous endpoint its output can be read from.
    async fn spawn_env_probe(&self, app: &str) -> Result<AttachedDyno, ApiError>;
}

/// Real platform API client.
pub struct ApiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, V3_ACCEPT)
            .send()
            .await
            .map_err(|e| ApiError::Request {
                method: "GET",
                path: path.to_owned(),
                source: e,
            })?;

        Self::decode(path, response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .post(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, V3_ACCEPT)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Request {
                method: "POST",
                path: path.to_owned(),
                source: e,
            })?;

        Self::decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status,
                path: path.to_owned(),
                body,
            });
        }

        response.json().await.map_err(|e| ApiError::Decode {
            path: path.to_owned(),
            source: e,
        })
    }
}

impl PlatformApi for ApiClient {
    async fn get_app(&self, app: &str) -> Result<App, ApiError> {
        self.get_json(&format!("/apps/{app}")).await
    }

    async fn get_releases(&self, app: &str) -> Result<Vec<Release>, ApiError> {
        self.get_json(&format!("/apps/{app}/releases")).await
    }

    async fn get_slug(&self, app: &str, slug_id: &str) -> Result<Slug, ApiError> {
        self.get_json(&format!("/apps/{app}/slugs/{slug_id}")).await
    }

    async fn get_formation(&self, app: &str) -> Result<Vec<Formation>, ApiError> {
        self.get_json(&format!("/apps/{app}/formation")).await
    }

    async fn get_config_vars(&self, app: &str) -> Result<ConfigVars, ApiError> {
        self.get_json(&format!("/apps/{app}/config-vars")).await
    }

    async fn spawn_env_probe(&self, app: &str) -> Result<AttachedDyno, ApiError> {
        tracing::debug!(app, "spawning one-off env probe");
        let body = serde_json::json!({
            "command": "env",
            "attach": true,
        });
        self.post_json(&format!("/apps/{app}/dynos"), &body).await
    }
}
