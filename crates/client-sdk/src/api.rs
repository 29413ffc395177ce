use common::{ApiErrorBody, Calculation, HealthReport, NewUser, User, UserId};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};

/// Thin typed wrapper over the backend's REST routes.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /health`. Any JSON body is a report whatever the status code,
    /// since an unhealthy backend answers 500 with a regular payload; only a
    /// body that is not JSON at all is an error.
    pub async fn health(&self) -> Result<HealthReport, ApiError> {
        let response = self.send_get("/health").await?;
        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::Network)?;

        match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(value) => Ok(HealthReport::from_json(&value)),
            Err(_) if !status.is_success() => Err(rejection(status, &body)),
            Err(err) => Err(ApiError::Decode(err)),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        read_json(self.send_get("/users").await?).await
    }

    pub async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        read_json(self.send_get(&format!("/users/{id}")).await?).await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        let url = self.url("/users");
        debug!(%url, name = %user.name, "POST");

        let response = self
            .http
            .post(url)
            .json(user)
            .send()
            .await
            .map_err(ApiError::Network)?;

        read_json(response).await
    }

    /// `GET /crash?value=<value>`; the backend divides 100 by `value`.
    pub async fn calculate(&self, value: i64) -> Result<Calculation, ApiError> {
        let url = self.url("/crash");
        debug!(%url, value, "GET");

        let response = self
            .http
            .get(url)
            .query(&[("value", value)])
            .send()
            .await
            .map_err(ApiError::Network)?;

        read_json(response).await
    }

    async fn send_get(&self, path: &str) -> Result<Response, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");
        self.http.get(url).send().await.map_err(ApiError::Network)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(ApiError::Network)?;

    if !status.is_success() {
        return Err(rejection(status, &body));
    }

    serde_json::from_slice(&body).map_err(ApiError::Decode)
}

fn rejection(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ApiErrorBody>(body)
        .map(|body| body.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .map(ToString::to_string)
                .unwrap_or_else(|| status.to_string())
        });

    ApiError::Rejected { status, message }
}
