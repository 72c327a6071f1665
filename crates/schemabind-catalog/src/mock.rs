//! Mock catalog source for tests and demos
//!
//! Serves a hand-built [`RawCatalog`] without connecting anywhere.
//! Requested schemas are filtered the way a live source would scope
//! its queries; asking for a schema the catalog does not contain
//! simply yields empty row sets (the graph builder turns that into
//! its own SchemaNotFound error).

use crate::rows::RawCatalog;
use crate::source::{CatalogSource, FetchError};

/// In-memory catalog source.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    catalog: RawCatalog,
    fail_connection: bool,
}

impl MockSource {
    pub fn new(catalog: RawCatalog) -> Self {
        Self {
            catalog,
            fail_connection: false,
        }
    }

    /// Make `test_connection` (and fetches) fail, to exercise error
    /// paths.
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }
}

#[async_trait::async_trait]
impl CatalogSource for MockSource {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn fetch_catalog(&self, schemas: &[String]) -> Result<RawCatalog, FetchError> {
        if self.fail_connection {
            return Err(FetchError::NetworkError(
                "simulated connection failure".to_string(),
            ));
        }
        Ok(self.catalog.restricted_to(schemas))
    }

    async fn test_connection(&self) -> Result<(), FetchError> {
        if self.fail_connection {
            return Err(FetchError::NetworkError(
                "simulated connection failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::ColumnRow;

    fn catalog_with_public_user() -> RawCatalog {
        RawCatalog {
            columns: vec![ColumnRow {
                schema: "public".to_string(),
                table: "user".to_string(),
                name: "id".to_string(),
                default: None,
                nullable: false,
                udt_name: "uuid".to_string(),
                data_type: "uuid".to_string(),
            }],
            ..RawCatalog::default()
        }
    }

    #[tokio::test]
    async fn fetch_scopes_to_requested_schemas() {
        let source = MockSource::new(catalog_with_public_user());

        let fetched = source
            .fetch_catalog(&["public".to_string()])
            .await
            .unwrap();
        assert_eq!(fetched.columns.len(), 1);

        let empty = source.fetch_catalog(&["other".to_string()]).await.unwrap();
        assert!(empty.columns.is_empty());
    }

    #[tokio::test]
    async fn simulated_connection_failure() {
        let source = MockSource::new(RawCatalog::default()).with_connection_failure();

        assert!(source.test_connection().await.is_err());
        assert!(source.fetch_catalog(&["public".to_string()]).await.is_err());
    }
}
