//! Module configuration: limits and the table/field names of the base.
//!
//! Defaults match the production base, whose tables and fields carry
//! Japanese names.
#![allow(clippy::non_ascii_literal)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderingConfig {
    /// Upper bound for `pcs` on a new order.
    pub max_pcs_per_order: u32,
    pub schema: OrderingSchema,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            max_pcs_per_order: 9999,
            schema: OrderingSchema::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderingSchema {
    pub stores: StoresTable,
    pub items: ItemsTable,
    pub calendar: CalendarTable,
    pub orders: OrdersTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoresTable {
    pub table: String,
    pub code_field: String,
    pub name_field: String,
}

impl Default for StoresTable {
    fn default() -> Self {
        Self {
            table: "店舗".to_owned(),
            code_field: "店舗コード".to_owned(),
            name_field: "店舗名".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ItemsTable {
    pub table: String,
    pub code_field: String,
    /// JSON string `{"itemCode": .., "itemName": ..}`.
    pub descriptor_field: String,
}

impl Default for ItemsTable {
    fn default() -> Self {
        Self {
            table: "アイテム".to_owned(),
            code_field: "商品コード".to_owned(),
            descriptor_field: "商品".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarTable {
    pub table: String,
    pub date_field: String,
    /// Link to the stores that may order on this date.
    pub stores_field: String,
    /// Lookup of the linked stores' codes.
    pub store_codes_field: String,
    /// List of JSON strings `{"itemCode": .., "itemName": ..}`.
    pub available_items_field: String,
    /// List of JSON strings `{"itemCode": .., "pcs": .., "orderNo": .., "orgCode": ..}`.
    pub placed_orders_field: String,
}

impl Default for CalendarTable {
    fn default() -> Self {
        Self {
            table: "カレンダー".to_owned(),
            date_field: "発注可能日".to_owned(),
            stores_field: "注文可能店舗".to_owned(),
            store_codes_field: "店舗コード".to_owned(),
            available_items_field: "注文可能アイテムリスト".to_owned(),
            placed_orders_field: "注文アイテムリスト".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrdersTable {
    pub table: String,
    pub store_field: String,
    pub calendar_field: String,
    pub item_field: String,
    pub pcs_field: String,
    /// Number assigned by the store when the order row is created.
    pub order_no_field: String,
}

impl Default for OrdersTable {
    fn default() -> Self {
        Self {
            table: "注文".to_owned(),
            store_field: "店舗".to_owned(),
            calendar_field: "注文日".to_owned(),
            item_field: "アイテム".to_owned(),
            pcs_field: "個数".to_owned(),
            order_no_field: "注文コード".to_owned(),
        }
    }
}
