//! Typed decoding of raw store records.
//!
//! List fields of the calendar embed one JSON document per element, usually
//! as a string (`["{\"itemCode\":1}", ...]`). Any element that fails to decode
//! fails the whole record with `MalformedRecord`.

use chrono::NaiveDate;
use record_store::Record;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{CalendarTable, ItemsTable, OrdersTable};
use crate::domain::error::DomainError;
use crate::domain::model::{
    AvailableItem, CalendarEntry, CatalogItem, ItemCode, OrderNo, PlacedOrder, RecordId,
};

/// A code or count stored either as a JSON number or as numeric text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Code {
    Number(serde_json::Number),
    Text(String),
}

impl Code {
    fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n) => n.as_u64(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvailableDescriptor {
    item_code: Code,
    #[serde(default)]
    item_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlacedDescriptor {
    item_code: Code,
    pcs: Code,
    #[serde(default)]
    order_no: Option<Code>,
    #[serde(default)]
    org_code: Option<Code>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogDescriptor {
    item_code: Code,
    item_name: String,
}

/// Decoding context: which record and field a failure belongs to.
struct Cursor<'a> {
    record: &'a Record,
    field: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(record: &'a Record, field: &'a str) -> Self {
        Self { record, field }
    }

    fn malformed(&self, message: impl Into<String>) -> DomainError {
        DomainError::malformed(&self.record.id, self.field, message)
    }

    fn value(&self) -> Option<&'a Value> {
        self.record.field(self.field)
    }

    fn item_code(&self, code: &Code) -> Result<ItemCode, DomainError> {
        code.as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(ItemCode::new)
            .ok_or_else(|| self.malformed("itemCode is not a non-negative integer"))
    }

    fn count(&self, code: &Code, name: &str) -> Result<u32, DomainError> {
        code.as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| self.malformed(format!("{name} is not a non-negative integer")))
    }

    fn document<T: DeserializeOwned>(&self, value: &Value) -> Result<T, DomainError> {
        match value {
            Value::String(raw) => serde_json::from_str(raw),
            other => T::deserialize(other),
        }
        .map_err(|e| self.malformed(e.to_string()))
    }

    /// Elements of an embedded list. A missing field is an empty list.
    fn documents<T: DeserializeOwned>(&self) -> Result<Vec<T>, DomainError> {
        match self.value() {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items.iter().map(|v| self.document(v)).collect(),
            Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Array(items)) => items.iter().map(|v| self.document(v)).collect(),
                Ok(single) => self.document(&single).map(|d| vec![d]),
                Err(e) => Err(self.malformed(e.to_string())),
            },
            Some(other) => self.document(other).map(|d| vec![d]),
        }
    }

    /// Accepts `YYYY-MM-DD` and ISO timestamps, keeping the calendar day.
    fn date(&self) -> Result<NaiveDate, DomainError> {
        let raw = match self.value() {
            Some(Value::String(s)) => s.as_str(),
            Some(Value::Array(items)) if items.len() == 1 => {
                items[0].as_str().ok_or_else(|| self.malformed("not a date"))?
            }
            Some(_) => return Err(self.malformed("not a date")),
            None => return Err(self.malformed("missing")),
        };
        raw.get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
            .ok_or_else(|| self.malformed(format!("'{raw}' is not a date")))
    }

    /// Codes of a lookup field, as text.
    fn codes(&self) -> Result<Vec<String>, DomainError> {
        let to_text = |v: &Value| {
            Code::deserialize(v)
                .map(Code::into_text)
                .map_err(|e| self.malformed(e.to_string()))
        };
        match self.value() {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items.iter().map(to_text).collect(),
            Some(other) => to_text(other).map(|c| vec![c]),
        }
    }
}

/// # Errors
/// `MalformedRecord` naming the first field that does not decode.
pub fn calendar_entry(record: &Record, table: &CalendarTable) -> Result<CalendarEntry, DomainError> {
    let date = Cursor::new(record, &table.date_field).date()?;
    let store_codes = Cursor::new(record, &table.store_codes_field).codes()?;

    let cursor = Cursor::new(record, &table.available_items_field);
    let available = cursor
        .documents::<AvailableDescriptor>()?
        .into_iter()
        .map(|d| -> Result<AvailableItem, DomainError> {
            Ok(AvailableItem {
                item_code: cursor.item_code(&d.item_code)?,
                item_name: d.item_name,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let cursor = Cursor::new(record, &table.placed_orders_field);
    let placed = cursor
        .documents::<PlacedDescriptor>()?
        .into_iter()
        .map(|d| -> Result<PlacedOrder, DomainError> {
            Ok(PlacedOrder {
                item_code: cursor.item_code(&d.item_code)?,
                pcs: cursor.count(&d.pcs, "pcs")?,
                order_no: d
                    .order_no
                    .as_ref()
                    .map(|n| {
                        n.as_u64()
                            .map(OrderNo)
                            .ok_or_else(|| cursor.malformed("orderNo is not a non-negative integer"))
                    })
                    .transpose()?,
                store_code: d.org_code.map(Code::into_text),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CalendarEntry {
        id: RecordId::new(record.id.as_str()),
        date,
        store_codes,
        available,
        placed,
    })
}

/// `Ok(None)` for a row without a descriptor, e.g. an empty spreadsheet row.
///
/// # Errors
/// `MalformedRecord` when the descriptor is present but does not decode.
pub fn catalog_item(record: &Record, table: &ItemsTable) -> Result<Option<CatalogItem>, DomainError> {
    let cursor = Cursor::new(record, &table.descriptor_field);
    let Some(value) = cursor.value() else {
        return Ok(None);
    };
    let descriptor: CatalogDescriptor = cursor.document(value)?;
    Ok(Some(CatalogItem {
        code: cursor.item_code(&descriptor.item_code)?,
        name: descriptor.item_name,
    }))
}

/// # Errors
/// `MalformedRecord` when the created row has no usable order number.
pub fn order_no(record: &Record, table: &OrdersTable) -> Result<OrderNo, DomainError> {
    let cursor = Cursor::new(record, &table.order_no_field);
    let value = cursor.value().ok_or_else(|| cursor.malformed("missing"))?;
    let code = Code::deserialize(value).map_err(|e| cursor.malformed(e.to_string()))?;
    code.as_u64()
        .map(OrderNo)
        .ok_or_else(|| cursor.malformed("not a non-negative integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(fields: Value) -> Record {
        let Value::Object(map) = fields else {
            panic!("fields must be an object");
        };
        Record::new("recTEST", map)
    }

    fn calendar_table() -> CalendarTable {
        CalendarTable {
            table: "calendar".to_owned(),
            date_field: "date".to_owned(),
            stores_field: "stores".to_owned(),
            store_codes_field: "store_codes".to_owned(),
            available_items_field: "available".to_owned(),
            placed_orders_field: "placed".to_owned(),
        }
    }

    #[test]
    fn decodes_embedded_json_strings() {
        let rec = record(json!({
            "date": "2020-12-01",
            "store_codes": [1001, "1002"],
            "available": [
                "{\"itemCode\":1,\"itemName\":\"bread\"}",
                "{\"itemCode\":\"2\"}"
            ],
            "placed": [
                "{\"itemCode\":1,\"pcs\":3,\"orderNo\":\"55\",\"orgCode\":1001}"
            ]
        }));

        let entry = calendar_entry(&rec, &calendar_table()).unwrap();

        assert_eq!(entry.id.as_str(), "recTEST");
        assert_eq!(entry.date.to_string(), "2020-12-01");
        assert_eq!(entry.store_codes, vec!["1001", "1002"]);
        assert_eq!(
            entry.available,
            vec![
                AvailableItem {
                    item_code: ItemCode::new(1),
                    item_name: Some("bread".to_owned())
                },
                AvailableItem {
                    item_code: ItemCode::new(2),
                    item_name: None
                },
            ]
        );
        assert_eq!(
            entry.placed,
            vec![PlacedOrder {
                item_code: ItemCode::new(1),
                pcs: 3,
                order_no: Some(OrderNo(55)),
                store_code: Some("1001".to_owned()),
            }]
        );
    }

    #[test]
    fn accepts_decoded_objects_timestamps_and_missing_lists() {
        let rec = record(json!({
            "date": "2020-12-01T00:00:00.000Z",
            "available": [{"itemCode": 4, "itemName": "jam"}]
        }));

        let entry = calendar_entry(&rec, &calendar_table()).unwrap();

        assert_eq!(entry.date.to_string(), "2020-12-01");
        assert_eq!(entry.available.len(), 1);
        assert!(entry.placed.is_empty());
        assert!(entry.store_codes.is_empty());
    }

    #[test]
    fn broken_embedded_json_names_record_and_field() {
        let rec = record(json!({
            "date": "2020-12-01",
            "placed": ["{\"itemCode\":1,"]
        }));

        let err = calendar_entry(&rec, &calendar_table()).unwrap_err();

        match err {
            DomainError::MalformedRecord {
                record_id, field, ..
            } => {
                assert_eq!(record_id, "recTEST");
                assert_eq!(field, "placed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_codes_and_missing_dates_are_malformed() {
        let negative = record(json!({
            "date": "2020-12-01",
            "available": ["{\"itemCode\":-1}"]
        }));
        assert!(matches!(
            calendar_entry(&negative, &calendar_table()),
            Err(DomainError::MalformedRecord { ref field, .. }) if field == "available"
        ));

        let undated = record(json!({"available": []}));
        assert!(matches!(
            calendar_entry(&undated, &calendar_table()),
            Err(DomainError::MalformedRecord { ref field, .. }) if field == "date"
        ));
    }

    #[test]
    fn catalog_rows_and_order_numbers() {
        let items = ItemsTable {
            table: "items".to_owned(),
            code_field: "code".to_owned(),
            descriptor_field: "item".to_owned(),
        };
        let row = record(json!({"item": "{\"itemCode\":7,\"itemName\":\"eggs\"}"}));
        assert_eq!(
            catalog_item(&row, &items).unwrap(),
            Some(CatalogItem {
                code: ItemCode::new(7),
                name: "eggs".to_owned()
            })
        );
        assert_eq!(catalog_item(&record(json!({})), &items).unwrap(), None);
        assert!(catalog_item(&record(json!({"item": "{}"})), &items).is_err());

        let orders = OrdersTable {
            order_no_field: "no".to_owned(),
            ..OrdersTable::default()
        };
        assert_eq!(order_no(&record(json!({"no": 42})), &orders).unwrap(), OrderNo(42));
        assert_eq!(order_no(&record(json!({"no": "43"})), &orders).unwrap(), OrderNo(43));
        assert!(order_no(&record(json!({})), &orders).is_err());
    }
}
