//! Admin GraphQL API client.
//!
//! Thin wrapper over `reqwest` that posts hand-written queries and unwraps
//! the `{data, errors}` GraphQL envelope into typed results.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::instrument;

use super::{AdminApiError, GraphQLError, GraphQLErrorLocation};
use crate::config::ShopifyAdminConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("eco-packaging-admin/", env!("CARGO_PKG_VERSION"));

/// Shopify Admin GraphQL API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: Option<SecretString>,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl AdminClient {
    /// Create a client for the configured store.
    ///
    /// A missing access token is not an error here; `execute` reports
    /// `AdminApiError::NoToken` per call so the pages can fail open.
    ///
    /// # Errors
    ///
    /// Returns `AdminApiError::Http` if the underlying HTTP client cannot
    /// be built.
    pub fn new(config: &ShopifyAdminConfig) -> Result<Self, AdminApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                endpoint: config.graphql_endpoint(),
                access_token: config.access_token.clone(),
            }),
        })
    }

    /// Whether an access token is configured at all.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner.access_token.is_some()
    }

    /// Execute a GraphQL query.
    ///
    /// # Errors
    ///
    /// Returns `AdminApiError::NoToken` if no token is configured.
    /// Returns `AdminApiError::Unauthorized` if Shopify rejects the token.
    /// Returns `AdminApiError::RateLimited` when throttled.
    /// Returns `AdminApiError::GraphQL` if the query returns errors.
    /// Returns `AdminApiError::Http` on network failures.
    #[instrument(skip(self, query, variables))]
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<T, AdminApiError> {
        let Some(token) = self.inner.access_token.as_ref() else {
            return Err(AdminApiError::NoToken);
        };

        let body = serde_json::json!({
            "query": query,
            "variables": variables.unwrap_or(serde_json::Value::Null)
        });

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("X-Shopify-Access-Token", token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(2);
            return Err(AdminApiError::RateLimited(retry_after));
        }

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AdminApiError::Unauthorized);
        }

        let graphql_response: GraphQLResponse<T> = response.json().await?;

        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect();
            return Err(AdminApiError::GraphQL(converted_errors));
        }

        graphql_response.data.ok_or_else(|| {
            AdminApiError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                locations: vec![],
                path: vec![],
            }])
        })
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("endpoint", &self.inner.endpoint)
            .field("has_token", &self.has_token())
            .finish()
    }
}
