//! Joins calendar entries with placed orders and the catalog.
//!
//! Duplicate item codes are resolved last-wins: a later descriptor in an entry
//! replaces an earlier one, and a later-dated entry replaces an earlier-dated
//! one.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::model::{
    CalendarEntry, CatalogItem, ItemAvailability, ItemCode, OrderLine, PlacedOrder, StoreCode,
};

fn placed_by_item<'a, I>(entries: I, store: &StoreCode) -> BTreeMap<ItemCode, &'a PlacedOrder>
where
    I: IntoIterator<Item = &'a CalendarEntry>,
{
    let mut index = BTreeMap::new();
    for entry in entries {
        for order in entry.placed.iter().filter(|o| o.belongs_to(store)) {
            if let Some(previous) = index.insert(order.item_code, order) {
                debug!(
                    item_code = %order.item_code,
                    date = %entry.date,
                    replaced_pcs = previous.pcs,
                    "duplicate placed order, keeping the later one"
                );
            }
        }
    }
    index
}

/// One line per available item per entry, with the store's order on that
/// entry (`pcs` 0 when none), sorted by date then item code.
#[must_use]
pub fn order_lines(entries: &[CalendarEntry], store: &StoreCode) -> Vec<OrderLine> {
    let mut lines = Vec::new();

    for entry in entries {
        let placed = placed_by_item(std::slice::from_ref(entry), store);
        lines.extend(entry.available.iter().map(|item| {
            let order = placed.get(&item.item_code);
            OrderLine {
                target_date: entry.date,
                item_code: item.item_code,
                item_name: item.item_name.clone(),
                pcs: order.map_or(0, |o| o.pcs),
                order_no: order.and_then(|o| o.order_no),
            }
        }));
    }

    lines.sort_by_key(|l| (l.target_date, l.item_code));
    lines
}

/// One row per catalog item, sorted by item code.
///
/// `open` is whether any entry offers the item. `pcs` is the store's latest
/// order for it in the range.
#[must_use]
pub fn item_availability(
    entries: &[CalendarEntry],
    catalog: &[CatalogItem],
    store: &StoreCode,
) -> Vec<ItemAvailability> {
    let mut by_date: Vec<&CalendarEntry> = entries.iter().collect();
    by_date.sort_by_key(|e| e.date);
    let placed = placed_by_item(by_date, store);

    let open: BTreeSet<ItemCode> = entries
        .iter()
        .flat_map(|e| e.available.iter().map(|a| a.item_code))
        .collect();

    let mut seen = BTreeSet::new();
    let mut rows: Vec<ItemAvailability> = catalog
        .iter()
        .filter(|item| seen.insert(item.code))
        .map(|item| ItemAvailability {
            item_code: item.code,
            item_name: item.name.clone(),
            open: open.contains(&item.code),
            pcs: placed.get(&item.code).map_or(0, |o| o.pcs),
        })
        .collect();

    rows.sort_by_key(|r| r.item_code);
    rows
}
