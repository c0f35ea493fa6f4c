//! Shopify Admin API client.
//!
//! # Architecture
//!
//! - Raw GraphQL over HTTP: one hand-written orders query, executed through
//!   a small typed envelope (`execute<T>`)
//! - Authentication via the `X-Shopify-Access-Token` header
//! - Read-only: the app never writes to the store through this client
//!
//! # Security
//!
//! The access token grants order and customer data access. It is held as a
//! `SecretString` and never logged; when it is missing the client returns
//! `AdminApiError::NoToken` and the pages fall back to empty data.

pub mod client;
pub mod conversions;
pub mod orders;

pub use client::AdminClient;
pub use conversions::{LineItemSummary, OrderSummary};

use thiserror::Error;

/// Errors that can occur when talking to the Admin GraphQL API.
#[derive(Debug, Error)]
pub enum AdminApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The access token was rejected.
    #[error("Access token rejected by Shopify")]
    Unauthorized,

    /// No access token configured (`SHOPIFY_ADMIN_TOKEN` unset).
    #[error("No Shopify Admin API token configured")]
    NoToken,
}

impl AdminApiError {
    /// Whether this error means "not authenticated" rather than "broken".
    ///
    /// The pages treat unauthenticated as an expected state (empty data, no
    /// alarm), so loaders log it at a lower level than real failures.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::NoToken | Self::Unauthorized)
    }
}

/// A GraphQL error returned by the Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Field not found".to_string(),
                locations: vec![],
                path: vec![],
            },
            GraphQLError {
                message: "Invalid ID".to_string(),
                locations: vec![],
                path: vec![],
            },
        ];
        let err = AdminApiError::GraphQL(errors);
        assert_eq!(err.to_string(), "GraphQL errors: Field not found; Invalid ID");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = AdminApiError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_auth_errors_are_classified() {
        assert!(AdminApiError::NoToken.is_auth());
        assert!(AdminApiError::Unauthorized.is_auth());
        assert!(!AdminApiError::RateLimited(5).is_auth());
    }
}
