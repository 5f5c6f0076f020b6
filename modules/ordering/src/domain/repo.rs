use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::DomainError;
use super::model::{
    CalendarEntry, CatalogItem, DateRange, ItemCode, OrderDraft, OrderNo, RecordId, StoreCode,
};

/// Access to the base's stores, items, calendar and orders tables.
///
/// Every method fails with `UpstreamUnavailable` or `UpstreamTimeout` when the
/// store cannot be used, and reads fail with `MalformedRecord` on records that
/// do not decode.
#[async_trait]
pub trait OrderingRepository: Send + Sync {
    /// Calendar entries listing `store` and dated within `range`.
    ///
    /// # Errors
    /// See the trait documentation.
    async fn calendar_entries(
        &self,
        store: &StoreCode,
        range: DateRange,
    ) -> Result<Vec<CalendarEntry>, DomainError>;

    /// The full item catalog.
    ///
    /// # Errors
    /// See the trait documentation.
    async fn catalog(&self) -> Result<Vec<CatalogItem>, DomainError>;

    /// # Errors
    /// See the trait documentation.
    async fn find_store(&self, store: &StoreCode) -> Result<Option<RecordId>, DomainError>;

    /// Calendar entry for `date` that lists `store`.
    ///
    /// # Errors
    /// See the trait documentation.
    async fn find_calendar_entry(
        &self,
        store: &StoreCode,
        date: NaiveDate,
    ) -> Result<Option<RecordId>, DomainError>;

    /// # Errors
    /// See the trait documentation.
    async fn find_item(&self, item: ItemCode) -> Result<Option<RecordId>, DomainError>;

    /// Appends an order row and returns the number the store assigned to it.
    ///
    /// # Errors
    /// See the trait documentation.
    async fn create_order(&self, draft: &OrderDraft) -> Result<OrderNo, DomainError>;
}
