use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name to raw JSON value, exactly as the store returns it.
pub type FieldMap = serde_json::Map<String, Value>;

/// One row of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    /// Empty cells are omitted by the store, so a missing key means "no value".
    #[serde(default)]
    pub fields: FieldMap,
}

impl Record {
    #[must_use]
    pub fn new(id: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            id: id.into(),
            created_time: None,
            fields,
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }
}
