//! HTTP-backed registry client.

use std::time::Duration;

use async_trait::async_trait;
use manar_persistence::catalog::EntityConfig;
use manar_persistence::types::FilterSpec;
use reqwest::{Client, Response, StatusCode};
use serde_json::{Map, Value};
use tracing::debug;

use crate::EntityApiClient;
use crate::error::{ClientError, ClientResult};

/// Client for a running registry server.
///
/// Wraps a pooled [`reqwest::Client`]; cloning is cheap and clones share the
/// connection pool.
#[derive(Clone)]
pub struct HttpEntityClient {
    http: Client,
    base_url: String,
}

impl HttpEntityClient {
    /// Creates a client for the server at `base_url`.
    ///
    /// A trailing slash on the base URL is tolerated. Requests time out
    /// after 30 seconds.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(HttpEntityClient { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turns a failure response into the matching [`ClientError`].
    async fn decode_error(response: Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(body);
        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound { message },
            StatusCode::BAD_REQUEST => ClientError::Rejected { message },
            _ => ClientError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    async fn expect_json(response: Response) -> ClientResult<Value> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::decode_error(response).await)
        }
    }

    /// Single-record fetch where a miss is part of normal operation.
    ///
    /// Only the record-miss 404 (the display-name envelope) becomes
    /// `Ok(None)`; an unknown-route 404 stays an error.
    async fn optional_json(
        response: Response,
        entity: &EntityConfig,
    ) -> ClientResult<Option<Value>> {
        if response.status() == StatusCode::NOT_FOUND {
            let err = Self::decode_error(response).await;
            return match &err {
                ClientError::NotFound { message }
                    if *message == format!("{} not found", entity.display_name) =>
                {
                    Ok(None)
                }
                _ => Err(err),
            };
        }
        Self::expect_json(response).await.map(Some)
    }

    fn records_from(body: Value) -> ClientResult<Vec<Value>> {
        Ok(serde_json::from_value(body)?)
    }
}

#[async_trait]
impl EntityApiClient for HttpEntityClient {
    async fn list(&self, entity: &EntityConfig) -> ClientResult<Vec<Value>> {
        debug!(entity = entity.path, "Listing records");
        let response = self
            .http
            .get(self.url(&format!("/api/{}", entity.path)))
            .send()
            .await?;
        Self::records_from(Self::expect_json(response).await?)
    }

    async fn search(
        &self,
        entity: &EntityConfig,
        filter: &FilterSpec,
    ) -> ClientResult<Vec<Value>> {
        let payload: Map<String, Value> = filter
            .iter()
            .map(|(attribute, value)| (attribute.to_string(), value.clone()))
            .collect();

        debug!(
            entity = entity.path,
            attributes = payload.len(),
            "Searching records"
        );

        let response = self
            .http
            .post(self.url(&format!("/api/{}/search", entity.path)))
            .json(&payload)
            .send()
            .await?;
        Self::records_from(Self::expect_json(response).await?)
    }

    async fn find_by_id(&self, entity: &EntityConfig, id: i64) -> ClientResult<Option<Value>> {
        let response = self
            .http
            .get(self.url(&format!("/api/{}/{}", entity.path, id)))
            .send()
            .await?;
        Self::optional_json(response, entity).await
    }

    async fn find_by_natural_key(
        &self,
        entity: &EntityConfig,
        key: &str,
    ) -> ClientResult<Option<Value>> {
        let Some(natural_key) = entity.natural_key else {
            return Err(ClientError::Rejected {
                message: format!("{} has no natural key lookup", entity.path),
            });
        };
        let response = self
            .http
            .get(self.url(&format!(
                "/api/{}/{}/{}",
                entity.path, natural_key.segment, key
            )))
            .send()
            .await?;
        Self::optional_json(response, entity).await
    }

    async fn create(&self, entity: &EntityConfig, body: &Value) -> ClientResult<Value> {
        debug!(entity = entity.path, "Creating record");
        let response = self
            .http
            .post(self.url(&format!("/api/{}", entity.path)))
            .json(body)
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn update(&self, entity: &EntityConfig, id: i64, body: &Value) -> ClientResult<Value> {
        debug!(entity = entity.path, id, "Updating record");
        let response = self
            .http
            .put(self.url(&format!("/api/{}/{}", entity.path, id)))
            .json(body)
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn delete(&self, entity: &EntityConfig, id: i64) -> ClientResult<()> {
        debug!(entity = entity.path, id, "Deleting record");
        let response = self
            .http
            .delete(self.url(&format!("/api/{}/{}", entity.path, id)))
            .send()
            .await?;
        Self::expect_json(response).await?;
        Ok(())
    }
}
