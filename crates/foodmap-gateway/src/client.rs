//! HTTP client for the food-provider REST API.
//!
//! Wraps `reqwest` with per-endpoint URL building, status checking and
//! tolerant record decoding. Individual records that fail to decode are
//! skipped with a warning; only a body that is not a JSON array fails the
//! whole request.

use std::time::Duration;

use foodmap_core::{status_csv, AppConfig, Coordinate, ProviderRecord, StatusSet};
use reqwest::{Client, Url};

use crate::error::RequestError;
use crate::gateway::QueryGateway;
use crate::normalize::normalize_provider;
use crate::types::FoodProviderDto;

const API_PREFIX: [&str; 3] = ["api", "v1", "food-providers"];
const MAX_CLOSEST_LIMIT: u32 = 20;

/// Client for the `/api/v1/food-providers` endpoints.
///
/// Use [`FoodProviderClient::from_config`] in the application or
/// [`FoodProviderClient::new`] to point at a mock server in tests.
pub struct FoodProviderClient {
    client: Client,
    base_url: Url,
}

impl FoodProviderClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RequestError::InvalidBaseUrl`] if
    /// `base_url` does not parse as an absolute http(s) URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, RequestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(|source| RequestError::Transport {
                operation: "Client setup",
                source,
            })?;

        let parsed = Url::parse(base_url).map_err(|e| RequestError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(RequestError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Creates a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// See [`FoodProviderClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, RequestError> {
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Builds an endpoint URL under the API prefix.
    ///
    /// Path segments are percent-encoded individually, so a street name
    /// containing `/` stays a single segment.
    fn endpoint(&self, segments: &[&str], params: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_PREFIX).extend(segments);
        }
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request, asserts a 2xx status and decodes a provider array.
    async fn request_providers(
        &self,
        operation: &'static str,
        url: Url,
    ) -> Result<Vec<ProviderRecord>, RequestError> {
        tracing::debug!(%url, operation, "querying food providers");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| RequestError::Transport { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status {
                operation,
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| RequestError::Transport { operation, source })?;
        decode_providers(operation, &body)
    }
}

/// Decodes a JSON array of providers, skipping entries that do not decode.
fn decode_providers(
    operation: &'static str,
    body: &str,
) -> Result<Vec<ProviderRecord>, RequestError> {
    let items: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|source| RequestError::Decode { operation, source })?;

    let records = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            serde_json::from_value::<FoodProviderDto>(item)
                .map_err(|e| {
                    tracing::warn!(index = idx, error = %e, operation, "skipping malformed provider record");
                })
                .ok()
        })
        .map(normalize_provider)
        .collect();
    Ok(records)
}

fn status_param(statuses: &StatusSet) -> Vec<(&'static str, String)> {
    status_csv(statuses)
        .map(|csv| vec![("status", csv)])
        .unwrap_or_default()
}

impl QueryGateway for FoodProviderClient {
    async fn find_by_name(
        &self,
        query: &str,
        statuses: &StatusSet,
    ) -> Result<Vec<ProviderRecord>, RequestError> {
        let url = self.endpoint(&["name", query], &status_param(statuses));
        self.request_providers("Search by name", url).await
    }

    async fn find_by_street(&self, query: &str) -> Result<Vec<ProviderRecord>, RequestError> {
        let url = self.endpoint(&["street", query], &[]);
        self.request_providers("Search by street", url).await
    }

    async fn find_closest(
        &self,
        origin: Coordinate,
        limit: u32,
        statuses: &StatusSet,
    ) -> Result<Vec<ProviderRecord>, RequestError> {
        let limit = limit.clamp(1, MAX_CLOSEST_LIMIT);
        let mut params = vec![
            ("lng", origin.lng.to_string()),
            ("lat", origin.lat.to_string()),
            ("limit", limit.to_string()),
        ];
        params.extend(status_param(statuses));
        let url = self.endpoint(&["closest"], &params);
        self.request_providers("Closest", url).await
    }

    async fn find_by_status(
        &self,
        statuses: &StatusSet,
    ) -> Result<Vec<ProviderRecord>, RequestError> {
        let url = self.endpoint(&["status"], &status_param(statuses));
        self.request_providers("Search by status", url).await
    }
}

#[cfg(test)]
mod tests {
    use foodmap_core::PermitStatus;

    use super::*;

    fn test_client(base_url: &str) -> FoodProviderClient {
        FoodProviderClient::new(base_url, 5, "foodmap-test/0.1")
            .expect("client construction should not fail")
    }

    #[test]
    fn endpoint_appends_api_prefix() {
        let client = test_client("http://localhost:8000");
        let url = client.endpoint(&["street", "Market St"], &[]);
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/food-providers/street/Market%20St"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_and_encodes_slashes() {
        let client = test_client("https://example.org/proxy/");
        let url = client.endpoint(&["name", "tacos/burritos"], &[]);
        assert_eq!(
            url.as_str(),
            "https://example.org/proxy/api/v1/food-providers/name/tacos%2Fburritos"
        );
    }

    #[test]
    fn endpoint_serializes_status_filter_as_csv() {
        let client = test_client("http://localhost:8000");
        let statuses: StatusSet = [PermitStatus::Requested, PermitStatus::Approved]
            .into_iter()
            .collect();
        let url = client.endpoint(&["status"], &status_param(&statuses));
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/food-providers/status?status=APPROVED%2CREQUESTED"
        );
    }

    #[test]
    fn empty_status_filter_adds_no_query() {
        let client = test_client("http://localhost:8000");
        let url = client.endpoint(&["status"], &status_param(&StatusSet::new()));
        assert_eq!(url.query(), None);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = FoodProviderClient::new("not a url", 5, "ua");
        assert!(matches!(result, Err(RequestError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn decode_skips_malformed_entries() {
        let body = r#"[{"locationId": "1", "name": "Ok"}, {"name": "no id"}, 7]"#;
        let records = decode_providers("Search by name", body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");
    }

    #[test]
    fn decode_rejects_non_array_body() {
        let result = decode_providers("Search by name", r#"{"detail": "nope"}"#);
        assert!(matches!(result, Err(RequestError::Decode { .. })));
    }
}
