use std::time::Duration;

use elis_utils::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::StoreError;

/// Largest page the list endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Connection settings for the record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordStoreConfig {
    /// API root, without the base id.
    pub base_url: String,
    pub base_id: String,
    /// Personal access token. Never serialized.
    #[serde(skip_serializing)]
    pub api_key: Option<SecretString>,
    /// Per-request timeout.
    #[serde(with = "elis_utils::humantime_serde")]
    pub timeout: Duration,
    /// Pages to follow per select. `1` reads only the first page.
    pub max_pages: u32,
    /// Records per page; the store default applies when unset.
    pub page_size: Option<u32>,
    pub user_agent: String,
}

impl Default for RecordStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.airtable.com/v0".to_owned(),
            base_id: "appb6z3h3fuTcygMi".to_owned(),
            api_key: None,
            timeout: Duration::from_secs(10),
            max_pages: 1,
            page_size: None,
            user_agent: concat!("elis-record-store/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl RecordStoreConfig {
    /// Checks the settings without touching the network.
    ///
    /// # Errors
    /// Returns [`StoreError::Config`] naming the first invalid setting.
    pub fn validate(&self) -> Result<(), StoreError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| StoreError::config(format!("base_url: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(StoreError::config("base_url: must be a hierarchical URL"));
        }
        if self.base_id.trim().is_empty() {
            return Err(StoreError::config("base_id: must not be empty"));
        }
        if self.max_pages == 0 {
            return Err(StoreError::config("max_pages: must be at least 1"));
        }
        if let Some(size) = self.page_size
            && (size == 0 || size > MAX_PAGE_SIZE)
        {
            return Err(StoreError::config(format!(
                "page_size: must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if self.timeout.is_zero() {
            return Err(StoreError::config("timeout: must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_read_one_page() {
        let cfg = RecordStoreConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_pages, 1);
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn api_key_is_not_serialized() {
        let cfg = RecordStoreConfig {
            api_key: Some(SecretString::new("pat-secret")),
            ..RecordStoreConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("pat-secret"));
        assert!(!json.contains("api_key"));
        assert!(json.contains(r#""timeout":"10s""#));
    }

    #[test]
    fn rejects_out_of_range_settings() {
        let bad_page = RecordStoreConfig {
            page_size: Some(101),
            ..RecordStoreConfig::default()
        };
        assert!(matches!(bad_page.validate(), Err(StoreError::Config(m)) if m.starts_with("page_size")));

        let bad_url = RecordStoreConfig {
            base_url: "not a url".to_owned(),
            ..RecordStoreConfig::default()
        };
        assert!(bad_url.validate().is_err());

        let no_pages = RecordStoreConfig {
            max_pages: 0,
            ..RecordStoreConfig::default()
        };
        assert!(no_pages.validate().is_err());
    }
}
