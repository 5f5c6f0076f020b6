//! Formulas selecting records by store, date and item.

use chrono::NaiveDate;
use record_store::Formula;

use crate::domain::model::{DateRange, ItemCode, StoreCode};

const DELIMITER: &str = ",";

/// True when `store` is one of the values of the list field.
///
/// Both the joined list and the code are wrapped in delimiters, so `100`
/// does not match a list holding only `1001`.
pub fn store_membership(list_field: &str, store: &StoreCode) -> Formula {
    let joined = Formula::concat([
        Formula::text(DELIMITER),
        Formula::call(
            "ARRAYJOIN",
            [Formula::field(list_field), Formula::text(DELIMITER)],
        ),
        Formula::text(DELIMITER),
    ]);
    Formula::call(
        "FIND",
        [Formula::text(format!("{DELIMITER}{store}{DELIMITER}")), joined],
    )
    .greater_than(Formula::number(0))
}

fn day_offset(date: NaiveDate, days: i64) -> Formula {
    Formula::call(
        "DATEADD",
        [
            Formula::text(date.to_string()),
            Formula::number(days),
            Formula::text("day"),
        ],
    )
}

/// `date_field >= date`, as a strict comparison against the previous day.
pub fn on_or_after(date_field: &str, date: NaiveDate) -> Formula {
    Formula::call("IS_AFTER", [Formula::field(date_field), day_offset(date, -1)])
}

/// `date_field <= date`, as a strict comparison against the next day.
pub fn on_or_before(date_field: &str, date: NaiveDate) -> Formula {
    Formula::call("IS_BEFORE", [Formula::field(date_field), day_offset(date, 1)])
}

pub fn date_within(date_field: &str, range: DateRange) -> Formula {
    Formula::and([
        on_or_after(date_field, range.start()),
        on_or_before(date_field, range.end()),
    ])
}

pub fn date_equals(date_field: &str, date: NaiveDate) -> Formula {
    Formula::field(date_field).equals(Formula::call(
        "DATETIME_PARSE",
        [Formula::text(date.to_string())],
    ))
}

/// Numeric codes compare as numbers, others as text.
pub fn store_code_equals(code_field: &str, store: &StoreCode) -> Formula {
    let value = match store.as_number() {
        Some(n) => Formula::number(n),
        None => Formula::text(store.as_str()),
    };
    Formula::field(code_field).equals(value)
}

pub fn item_code_equals(code_field: &str, item: ItemCode) -> Formula {
    Formula::field(code_field).equals(Formula::number(i64::from(item.value())))
}

/// Calendar entries open to `store` within `range`.
pub fn calendar_window(
    stores_field: &str,
    date_field: &str,
    store: &StoreCode,
    range: DateRange,
) -> Formula {
    Formula::and([
        store_membership(stores_field, store),
        on_or_after(date_field, range.start()),
        on_or_before(date_field, range.end()),
    ])
}

/// The calendar entry for `date` open to `store`.
pub fn calendar_day(
    stores_field: &str,
    date_field: &str,
    store: &StoreCode,
    date: NaiveDate,
) -> Formula {
    Formula::and([
        store_membership(stores_field, store),
        date_equals(date_field, date),
    ])
}
