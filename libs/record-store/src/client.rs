use async_trait::async_trait;

use crate::error::StoreError;
use crate::query::SelectQuery;
use crate::record::{FieldMap, Record};

/// Read and append access to the tables of one base.
///
/// Implementations are shared across request tasks behind an `Arc`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Lists records of `table` matching `query`.
    ///
    /// # Errors
    /// Transport, status and decode failures of the store call.
    async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Record>, StoreError>;

    /// Creates one record per field map and returns them as stored, in order.
    ///
    /// # Errors
    /// Transport, status and decode failures of the store call.
    async fn create(&self, table: &str, records: Vec<FieldMap>) -> Result<Vec<Record>, StoreError>;
}
