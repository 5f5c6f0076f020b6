use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::model::{
    DateRange, ItemAvailability, ItemCode, NewOrder, OrderLine, parse_date,
};

/// `?dayFrom=YYYY-MM-DD&dayTo=YYYY-MM-DD`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub day_from: Option<String>,
    pub day_to: Option<String>,
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, DomainError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DomainError::invalid_input(field, "is required"))
}

impl DateRangeQuery {
    /// # Errors
    /// `InvalidInput` when a bound is missing or not a date.
    pub fn to_range(&self) -> Result<DateRange, DomainError> {
        let from = parse_date(required(self.day_from.as_deref(), "dayFrom")?, "dayFrom")?;
        let to = parse_date(required(self.day_to.as_deref(), "dayTo")?, "dayTo")?;
        Ok(DateRange::new(from, to))
    }
}

/// A code sent either as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CodeInput {
    Number(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub item_code: CodeInput,
    pub order_date: String,
    pub pcs: i64,
}

impl CreateOrderRequest {
    /// # Errors
    /// `InvalidInput` naming the first field that does not convert.
    pub fn to_new_order(&self) -> Result<NewOrder, DomainError> {
        let item_code = match &self.item_code {
            CodeInput::Number(n) => u32::try_from(*n)
                .map(ItemCode::new)
                .map_err(|_| DomainError::invalid_input("itemCode", "must be a non-negative integer"))?,
            CodeInput::Text(s) => ItemCode::parse(s, "itemCode")?,
        };
        let order_date = parse_date(&self.order_date, "orderDate")?;
        // Range is enforced by the service; only the sign is checked here.
        let pcs = u32::try_from(self.pcs)
            .map_err(|_| DomainError::invalid_input("pcs", "must be a positive integer"))?;

        Ok(NewOrder {
            item_code,
            order_date,
            pcs,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineDto {
    pub target_date: NaiveDate,
    pub item_code: u32,
    pub item_name: Option<String>,
    pub pcs: u32,
    pub order_no: Option<u64>,
}

impl From<OrderLine> for OrderLineDto {
    fn from(line: OrderLine) -> Self {
        Self {
            target_date: line.target_date,
            item_code: line.item_code.value(),
            item_name: line.item_name,
            pcs: line.pcs,
            order_no: line.order_no.map(|n| n.0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAvailabilityDto {
    pub item_code: u32,
    pub item_name: String,
    pub open: bool,
    pub pcs: u32,
}

impl From<ItemAvailability> for ItemAvailabilityDto {
    fn from(row: ItemAvailability) -> Self {
        Self {
            item_code: row.item_code.value(),
            item_name: row.item_name,
            open: row.open,
            pcs: row.pcs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::OrderNo;
    use serde_json::json;

    #[test]
    fn range_query_requires_both_bounds() {
        let q = DateRangeQuery {
            day_from: Some("2020-12-01".to_owned()),
            day_to: None,
        };
        let err = q.to_range().unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput { ref field, .. } if field == "dayTo"));

        let q = DateRangeQuery {
            day_from: Some(" ".to_owned()),
            day_to: Some("2020-12-01".to_owned()),
        };
        assert!(q.to_range().is_err());
    }

    #[test]
    fn create_request_accepts_numeric_string_item_code() {
        let req: CreateOrderRequest =
            serde_json::from_value(json!({"itemCode": "7", "orderDate": "2020-12-01", "pcs": 3}))
                .unwrap();
        let order = req.to_new_order().unwrap();
        assert_eq!(order.item_code, ItemCode::new(7));
        assert_eq!(order.order_date.to_string(), "2020-12-01");
        assert_eq!(order.pcs, 3);
    }

    #[test]
    fn create_request_rejects_negative_values() {
        let req: CreateOrderRequest =
            serde_json::from_value(json!({"itemCode": -1, "orderDate": "2020-12-01", "pcs": 3}))
                .unwrap();
        assert!(matches!(
            req.to_new_order(),
            Err(DomainError::InvalidInput { ref field, .. }) if field == "itemCode"
        ));

        let req: CreateOrderRequest =
            serde_json::from_value(json!({"itemCode": 1, "orderDate": "2020-12-01", "pcs": -2}))
                .unwrap();
        assert!(matches!(
            req.to_new_order(),
            Err(DomainError::InvalidInput { ref field, .. }) if field == "pcs"
        ));
    }

    #[test]
    fn order_line_serializes_camel_case_with_iso_date() {
        let dto = OrderLineDto::from(OrderLine {
            target_date: NaiveDate::from_ymd_opt(2020, 12, 1).unwrap(),
            item_code: ItemCode::new(7),
            item_name: None,
            pcs: 0,
            order_no: Some(OrderNo(12)),
        });
        assert_eq!(
            serde_json::to_value(dto).unwrap(),
            json!({"targetDate": "2020-12-01", "itemCode": 7, "itemName": null, "pcs": 0, "orderNo": 12})
        );
    }
}
