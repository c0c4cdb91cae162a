//! OData Client Module
//!
//! HTTP access to the remote OData service. Every request carries the
//! `ApiKey` header; non-200 answers and unusable bodies surface as
//! upstream errors for the boundary to render.

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{AdapterError, Result};

/// Header conveying the service credential.
const API_KEY_HEADER: &str = "ApiKey";

// == OData Client ==
/// Client for one OData service root.
#[derive(Debug, Clone)]
pub struct ODataClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl ODataClient {
    // == Constructor ==
    /// Creates a new client for a service root and credential.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Creates a client from the adapter configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.odata_endpoint.clone(), config.api_key.clone())
    }

    // == Validate Credentials ==
    /// Probes the service root with the configured credential.
    ///
    /// Returns `Ok(true)` only for an HTTP 200 answer. A missing key is
    /// invalid without a round trip.
    pub async fn validate_credentials(&self) -> Result<bool> {
        if self.api_key.is_empty() {
            return Ok(false);
        }

        debug!("validating credentials against {}", self.base_url);
        let response = self.request(&self.service_url("")).await?;

        Ok(response.status().as_u16() == 200)
    }

    // == List Tables ==
    /// Lists the table names published in the service document.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let body: Value = self
            .request_ok(&self.service_url(""))
            .await?
            .json()
            .await
            .map_err(|e| AdapterError::Upstream(format!("unreadable service document: {}", e)))?;

        let tables = body
            .get("value")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                AdapterError::Upstream("service document lists no tables".to_string())
            })?
            .iter()
            .filter_map(|table| table.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        Ok(tables)
    }

    // == Fetch Metadata ==
    /// Retrieves the raw `$metadata` document.
    pub async fn fetch_metadata(&self) -> Result<String> {
        self.request_ok(&self.service_url("$metadata"))
            .await?
            .text()
            .await
            .map_err(|e| AdapterError::Upstream(format!("unreadable metadata document: {}", e)))
    }

    // == Fetch Rows ==
    /// Retrieves all rows of one entity set.
    ///
    /// The service answers `{ "value": [ ...rows ] }`; a missing or empty
    /// array is an upstream failure, not an empty table.
    pub async fn fetch_rows(&self, entity: &str) -> Result<Vec<Value>> {
        let body: Value = self
            .request_ok(&self.service_url(entity))
            .await?
            .json()
            .await
            .map_err(|e| AdapterError::Upstream(format!("unreadable entity response: {}", e)))?;

        let rows: Vec<Value> = body
            .get("value")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| {
                AdapterError::Upstream(format!("no row array in response for {}", entity))
            })?;

        if rows.is_empty() {
            return Err(AdapterError::Upstream(format!(
                "empty response from server for {}",
                entity
            )));
        }

        Ok(rows)
    }

    /// Issues one GET with the credential header.
    async fn request(&self, url: &str) -> Result<reqwest::Response> {
        self.http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| AdapterError::Upstream(format!("request to {} failed: {}", url, e)))
    }

    /// Issues one GET and insists on HTTP 200.
    async fn request_ok(&self, url: &str) -> Result<reqwest::Response> {
        let response = self.request(url).await?;
        let status = response.status();

        if status.as_u16() != 200 {
            return Err(AdapterError::Upstream(format!(
                "unexpected status {} from {}",
                status, url
            )));
        }

        Ok(response)
    }

    fn service_url(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}/", self.base_url)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}
