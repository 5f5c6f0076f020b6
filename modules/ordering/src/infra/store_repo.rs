//! [`OrderingRepository`] over a [`RecordStore`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use record_store::{FieldMap, Record, RecordStore, SelectQuery, SortDirection, StoreError};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{filters, projector};
use crate::config::OrderingSchema;
use crate::domain::error::DomainError;
use crate::domain::model::{
    CalendarEntry, CatalogItem, DateRange, ItemCode, OrderDraft, OrderNo, RecordId, StoreCode,
};
use crate::domain::repo::OrderingRepository;

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        if e.is_timeout() {
            Self::UpstreamTimeout(e.to_string())
        } else {
            Self::UpstreamUnavailable(e.to_string())
        }
    }
}

pub struct RecordStoreRepository {
    store: Arc<dyn RecordStore>,
    schema: OrderingSchema,
}

impl RecordStoreRepository {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, schema: OrderingSchema) -> Self {
        Self { store, schema }
    }

    /// Id of the first matching record; lookups are expected to be unique.
    async fn first_id(
        &self,
        table: &str,
        query: &SelectQuery,
    ) -> Result<Option<RecordId>, DomainError> {
        let records = self.store.select(table, query).await?;
        if records.len() > 1 {
            debug!(table, matches = records.len(), "lookup matched several records, using the first");
        }
        Ok(records.into_iter().next().map(|r| RecordId::new(r.id)))
    }
}

fn link(id: &RecordId) -> Value {
    json!([id.as_str()])
}

#[async_trait]
impl OrderingRepository for RecordStoreRepository {
    async fn calendar_entries(
        &self,
        store: &StoreCode,
        range: DateRange,
    ) -> Result<Vec<CalendarEntry>, DomainError> {
        let t = &self.schema.calendar;
        let query = SelectQuery::new()
            .filter(filters::calendar_window(&t.stores_field, &t.date_field, store, range))
            .fields([
                t.date_field.as_str(),
                t.store_codes_field.as_str(),
                t.available_items_field.as_str(),
                t.placed_orders_field.as_str(),
            ])
            .sort_by(t.date_field.as_str(), SortDirection::Asc);

        self.store
            .select(&t.table, &query)
            .await?
            .iter()
            .map(|r| projector::calendar_entry(r, t))
            .collect()
    }

    async fn catalog(&self) -> Result<Vec<CatalogItem>, DomainError> {
        let t = &self.schema.items;
        let query = SelectQuery::new()
            .fields([t.descriptor_field.as_str()])
            .sort_by(t.code_field.as_str(), SortDirection::Asc);

        let records: Vec<Record> = self.store.select(&t.table, &query).await?;
        let mut items = Vec::with_capacity(records.len());
        for record in &records {
            match projector::catalog_item(record, t)? {
                Some(item) => items.push(item),
                None => warn!(record_id = %record.id, "catalog row without item descriptor skipped"),
            }
        }
        Ok(items)
    }

    async fn find_store(&self, store: &StoreCode) -> Result<Option<RecordId>, DomainError> {
        let t = &self.schema.stores;
        let query = SelectQuery::new()
            .filter(filters::store_code_equals(&t.code_field, store))
            .fields([t.code_field.as_str()]);
        self.first_id(&t.table, &query).await
    }

    async fn find_calendar_entry(
        &self,
        store: &StoreCode,
        date: NaiveDate,
    ) -> Result<Option<RecordId>, DomainError> {
        let t = &self.schema.calendar;
        let query = SelectQuery::new()
            .filter(filters::calendar_day(&t.stores_field, &t.date_field, store, date))
            .fields([t.date_field.as_str()]);
        self.first_id(&t.table, &query).await
    }

    async fn find_item(&self, item: ItemCode) -> Result<Option<RecordId>, DomainError> {
        let t = &self.schema.items;
        let query = SelectQuery::new()
            .filter(filters::item_code_equals(&t.code_field, item))
            .fields([t.code_field.as_str()]);
        self.first_id(&t.table, &query).await
    }

    async fn create_order(&self, draft: &OrderDraft) -> Result<OrderNo, DomainError> {
        let t = &self.schema.orders;
        let mut fields = FieldMap::new();
        fields.insert(t.store_field.clone(), link(&draft.store));
        fields.insert(t.calendar_field.clone(), link(&draft.calendar_entry));
        fields.insert(t.item_field.clone(), link(&draft.item));
        fields.insert(t.pcs_field.clone(), json!(draft.pcs));

        let created = self.store.create(&t.table, vec![fields]).await?;
        let record = created.first().ok_or_else(|| {
            DomainError::UpstreamUnavailable("order creation returned no record".to_owned())
        })?;
        debug!(record_id = %record.id, "order row created");
        projector::order_no(record, t)
    }
}
