//! Database write adapter.

use async_trait::async_trait;
use serde_json::Value;

use super::AdapterError;

/// Database writes, as consumed by the `Action` handler's `database`
/// action type. Reads are not part of the core contract.
#[async_trait]
pub trait DatabaseWriter: Send + Sync {
    /// Insert a document into a collection, returning the stored form.
    async fn insert(&self, collection: &str, document: &Value) -> Result<Value, AdapterError>;

    /// Update documents matching `filter`, returning the update summary.
    async fn update(
        &self,
        collection: &str,
        filter: &Value,
        update: &Value,
    ) -> Result<Value, AdapterError>;
}
