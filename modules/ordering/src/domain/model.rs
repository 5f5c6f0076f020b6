//! Domain types. Raw client input is turned into these at the API edge, and
//! store records at the infra edge; nothing below either edge sees strings
//! that have not been validated.

use std::fmt;

use chrono::NaiveDate;

use super::error::DomainError;

pub const STORE_CODE_MAX_LEN: usize = 32;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Store (organization) code, e.g. `1001`.
///
/// Restricted to ASCII letters, digits, `-` and `_`, so it can be embedded in
/// a formula and compared without normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreCode(String);

impl StoreCode {
    /// # Errors
    /// `InvalidInput` on `orgCode` when the code is empty, too long, or has
    /// characters outside the allowed set.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let code = raw.trim();
        if code.is_empty() {
            return Err(DomainError::invalid_input("orgCode", "must not be empty"));
        }
        if code.len() > STORE_CODE_MAX_LEN
            || !code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::invalid_input(
                "orgCode",
                format!(
                    "must be 1 to {STORE_CODE_MAX_LEN} characters of letters, digits, '-' or '_'"
                ),
            ));
        }
        Ok(Self(code.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The code as a number when it consists of digits only.
    #[must_use]
    pub fn as_number(&self) -> Option<i64> {
        if self.0.bytes().all(|b| b.is_ascii_digit()) {
            self.0.parse().ok()
        } else {
            None
        }
    }

    /// Compares with a code read from a record, which may have been stored as
    /// a number (`1001`) or text (`"1001"`).
    #[must_use]
    pub fn matches(&self, stored: &str) -> bool {
        let stored = stored.trim();
        if self.0 == stored {
            return true;
        }
        match (self.as_number(), stored.parse::<i64>()) {
            (Some(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for StoreCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemCode(u32);

impl ItemCode {
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// # Errors
    /// `InvalidInput` on `field` unless `raw` is a non-negative integer.
    pub fn parse(raw: &str, field: &str) -> Result<Self, DomainError> {
        raw.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| DomainError::invalid_input(field, "must be a non-negative integer"))
    }
}

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a client-supplied `YYYY-MM-DD` date.
///
/// # Errors
/// `InvalidInput` on `field` for any other shape or an impossible date.
pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::invalid_input(field, "must be a date formatted as YYYY-MM-DD"))
}

/// Inclusive date range. `from > to` is a valid, empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub const fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub const fn start(self) -> NaiveDate {
        self.from
    }

    #[must_use]
    pub const fn end(self) -> NaiveDate {
        self.to
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.from > self.to
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Store-side id of a record, e.g. `recXXXXXXXXXXXXXX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number the store assigns to a newly created order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderNo(pub u64);

impl fmt::Display for OrderNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableItem {
    pub item_code: ItemCode,
    pub item_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub item_code: ItemCode,
    pub pcs: u32,
    pub order_no: Option<OrderNo>,
    /// Code of the ordering store, when the descriptor records it.
    pub store_code: Option<String>,
}

impl PlacedOrder {
    /// Orders without a store code are attributed to every store that can see
    /// the calendar entry.
    #[must_use]
    pub fn belongs_to(&self, store: &StoreCode) -> bool {
        self.store_code
            .as_deref()
            .is_none_or(|code| store.matches(code))
    }
}

/// One ordering window: a date on which some stores may order some items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    pub id: RecordId,
    pub date: NaiveDate,
    /// Codes of the stores allowed to order. Empty when not projected.
    pub store_codes: Vec<String>,
    pub available: Vec<AvailableItem>,
    pub placed: Vec<PlacedOrder>,
}

impl CalendarEntry {
    #[must_use]
    pub fn serves(&self, store: &StoreCode) -> bool {
        self.store_codes.is_empty() || self.store_codes.iter().any(|c| store.matches(c))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub code: ItemCode,
    pub name: String,
}

/// One orderable item on one date, with what the store has ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub target_date: NaiveDate,
    pub item_code: ItemCode,
    pub item_name: Option<String>,
    pub pcs: u32,
    pub order_no: Option<OrderNo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAvailability {
    pub item_code: ItemCode,
    pub item_name: String,
    pub open: bool,
    pub pcs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrder {
    pub item_code: ItemCode,
    pub order_date: NaiveDate,
    pub pcs: u32,
}

/// Resolved references for an order row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub store: RecordId,
    pub calendar_entry: RecordId,
    pub item: RecordId,
    pub pcs: u32,
}
