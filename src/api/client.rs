//! HTTP client for storefront API requests.
//!
//! This module provides a low-level HTTP client wrapper for making requests
//! to the storefront backend, handling resource path construction, status
//! checking, and response parsing.

use super::error::ApiError;
use super::resource::Resource;
use log::*;
use reqwest::{Method, Response, StatusCode};
use std::time::Duration;

/// Client-enforced deadline per attempt; callers never retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Makes requests to the storefront backend and tries to conform response
/// data to the given resource type.
///
pub(crate) struct Client {
    base_url: String,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given base URL.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created. This should never happen
    /// in practice as reqwest::Client::builder().build() only fails on
    /// invalid configuration, which we don't use.
    pub fn new(base_url: &str) -> Self {
        Client {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client - this should never happen"),
        }
    }

    /// Return all entities in the resource collection under the store.
    ///
    pub async fn list<T: Resource>(&self, store_id: &str) -> Result<Vec<T>, ApiError> {
        let response = self
            .call(Method::GET, &T::collection_path(store_id), None)
            .await?;
        Self::decode(response).await
    }

    /// Create an entity in the resource collection and return the backend's
    /// view of it.
    ///
    pub async fn create<T: Resource>(
        &self,
        store_id: &str,
        input: &T::Input,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(input)?;
        let response = self
            .call(Method::POST, &T::collection_path(store_id), Some(body))
            .await?;
        Self::decode(response).await
    }

    /// Update an existing entity and return the backend's view of it.
    ///
    pub async fn update<T: Resource>(
        &self,
        store_id: &str,
        id: &str,
        input: &T::Input,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(input)?;
        let response = self
            .call(Method::PATCH, &T::entity_path(store_id, id), Some(body))
            .await?;
        Self::decode(response).await
    }

    /// Delete an existing entity.
    ///
    pub async fn delete<T: Resource>(&self, store_id: &str, id: &str) -> Result<(), ApiError> {
        self.call(Method::DELETE, &T::entity_path(store_id, id), None)
            .await?;
        Ok(())
    }

    /// Make a request and return the response, mapping transport failures and
    /// non-success statuses into `ApiError`.
    ///
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, ApiError> {
        let request_url = format!("{}/{}", &self.base_url, path);
        debug!("Requesting {} {}...", method, request_url);

        let mut request = self.http_client.request(method, &request_url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            // The backend signals a referential-integrity delete rejection
            // with 409 Conflict.
            if status == StatusCode::CONFLICT {
                return Err(ApiError::Constraint);
            }
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("Unable to read response"));
            error!(
                "API request failed with status {}: {}",
                status, message
            );
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Read the response body and deserialize it into the expected shape.
    ///
    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response_bytes = response.bytes().await.map_err(ApiError::from)?;
        match serde_json::from_slice::<T>(&response_bytes) {
            Ok(data) => Ok(data),
            Err(e) => {
                let response_text = String::from_utf8_lossy(&response_bytes);
                error!(
                    "Failed to deserialize API response: {}. Response body: {}",
                    e, response_text
                );
                Err(ApiError::Deserialization(e))
            }
        }
    }
}
