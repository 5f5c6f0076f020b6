use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::enrichment;
use super::error::{DomainError, Entity};
use super::model::{
    CalendarEntry, DateRange, ItemAvailability, NewOrder, OrderDraft, OrderLine, OrderNo,
    StoreCode,
};
use super::repo::OrderingRepository;

pub struct ServiceConfig {
    pub max_pcs_per_order: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_pcs_per_order: 9999,
        }
    }
}

pub struct Service {
    repo: Arc<dyn OrderingRepository>,
    config: ServiceConfig,
}

impl Service {
    #[must_use]
    pub fn new(repo: Arc<dyn OrderingRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    /// Ordering windows of `store` in `range`, one line per available item.
    ///
    /// # Errors
    /// Upstream and malformed-record errors from the repository.
    #[instrument(skip_all, fields(store = %store, from = %range.start(), to = %range.end()))]
    pub async fn list_orders(
        &self,
        store: &StoreCode,
        range: DateRange,
    ) -> Result<Vec<OrderLine>, DomainError> {
        if range.is_empty() {
            debug!("empty date range");
            return Ok(Vec::new());
        }

        let entries = self.entries_for(store, range).await?;
        let lines = enrichment::order_lines(&entries, store);
        debug!(entries = entries.len(), lines = lines.len(), "orders listed");
        Ok(lines)
    }

    /// Per catalog item: whether it can be ordered in `range` and how many
    /// pieces the store ordered.
    ///
    /// # Errors
    /// Upstream and malformed-record errors from the repository.
    #[instrument(skip_all, fields(store = %store, from = %range.start(), to = %range.end()))]
    pub async fn list_items(
        &self,
        store: &StoreCode,
        range: DateRange,
    ) -> Result<Vec<ItemAvailability>, DomainError> {
        if range.is_empty() {
            debug!("empty date range");
            return Ok(Vec::new());
        }

        let (entries, catalog) =
            tokio::try_join!(self.entries_for(store, range), self.repo.catalog())?;
        let rows = enrichment::item_availability(&entries, &catalog, store);
        debug!(entries = entries.len(), items = rows.len(), "item availability computed");
        Ok(rows)
    }

    /// Resolves store, ordering date and item, then records the order.
    ///
    /// Nothing is written unless all three lookups succeed.
    ///
    /// # Errors
    /// `InvalidInput` for an out-of-range quantity, `NotFound` for the first
    /// lookup that matches nothing, and repository errors.
    #[instrument(
        skip_all,
        fields(store = %store, item_code = %order.item_code, order_date = %order.order_date, pcs = order.pcs)
    )]
    pub async fn create_order(
        &self,
        store: &StoreCode,
        order: NewOrder,
    ) -> Result<OrderNo, DomainError> {
        self.validate_pcs(order.pcs)?;

        let store_id = self
            .repo
            .find_store(store)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Store, store.as_str()))?;

        let calendar_entry = self
            .repo
            .find_calendar_entry(store, order.order_date)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::OrderDate, order.order_date.to_string()))?;

        let item = self
            .repo
            .find_item(order.item_code)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Item, order.item_code.to_string()))?;

        let draft = OrderDraft {
            store: store_id,
            calendar_entry,
            item,
            pcs: order.pcs,
        };
        let order_no = self.repo.create_order(&draft).await?;

        info!(%order_no, "order created");
        Ok(order_no)
    }

    async fn entries_for(
        &self,
        store: &StoreCode,
        range: DateRange,
    ) -> Result<Vec<CalendarEntry>, DomainError> {
        let mut entries = self.repo.calendar_entries(store, range).await?;
        let fetched = entries.len();
        entries.retain(|e| range.contains(e.date) && e.serves(store));
        if entries.len() < fetched {
            debug!(dropped = fetched - entries.len(), "entries outside range or store dropped");
        }
        Ok(entries)
    }

    fn validate_pcs(&self, pcs: u32) -> Result<(), DomainError> {
        if pcs == 0 || pcs > self.config.max_pcs_per_order {
            return Err(DomainError::invalid_input(
                "pcs",
                format!("must be between 1 and {}", self.config.max_pcs_per_order),
            ));
        }
        Ok(())
    }
}
