//! Catalog source trait

use crate::rows::RawCatalog;

/// Errors that can occur while fetching catalog rows.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("authentication failed: {0}")]
    AuthenticationError(String),

    #[error("query failed: {0}")]
    QueryError(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// A source of raw catalog rows.
///
/// Implementations may issue the five underlying row fetches
/// concurrently; the returned [`RawCatalog`] is always a complete
/// snapshot. Connection-level failure handling (retries, timeouts)
/// belongs to the source, never to the graph builder.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Source name for logging (e.g. "PostgreSQL", "Mock").
    fn name(&self) -> &'static str;

    /// Fetch the five row sets for the requested schemas.
    async fn fetch_catalog(&self, schemas: &[String]) -> Result<RawCatalog, FetchError>;

    /// Validate connectivity before attempting a fetch.
    async fn test_connection(&self) -> Result<(), FetchError>;
}
