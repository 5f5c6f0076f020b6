use std::fmt;

/// What a failed exact-match lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Store,
    OrderDate,
    Item,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Store => "store",
            Self::OrderDate => "ordering date",
            Self::Item => "item",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{entity} '{key}' not found")]
    NotFound { entity: Entity, key: String },

    #[error("invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("record {record_id} has a malformed '{field}' field: {message}")]
    MalformedRecord {
        record_id: String,
        field: String,
        message: String,
    },

    #[error("record store unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("record store timed out: {0}")]
    UpstreamTimeout(String),
}

impl DomainError {
    #[must_use]
    pub fn not_found(entity: Entity, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn malformed(
        record_id: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            record_id: record_id.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}
