//! HTTP implementation of [`RecordStore`] for the Airtable REST API v0.

use async_trait::async_trait;
use elis_utils::SecretString;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::client::RecordStore;
use crate::config::RecordStoreConfig;
use crate::error::StoreError;
use crate::query::SelectQuery;
use crate::record::{FieldMap, Record};

/// Records accepted by one create request.
const CREATE_BATCH: usize = 10;
/// Error bodies are cut to this many chars before they reach logs.
const ERROR_PREVIEW_CHARS: usize = 200;

#[derive(Deserialize)]
struct ListPage {
    #[serde(default)]
    records: Vec<Record>,
    offset: Option<String>,
}

#[derive(Serialize)]
struct NewRecord<'a> {
    fields: &'a FieldMap,
}

#[derive(Serialize)]
struct CreateBody<'a> {
    records: Vec<NewRecord<'a>>,
    typecast: bool,
}

#[derive(Deserialize)]
struct CreatedRecords {
    records: Vec<Record>,
}

/// `reqwest::Client` is internally reference counted, so this is cheap to share.
pub struct AirtableClient {
    http: reqwest::Client,
    base: Url,
    api_key: Option<SecretString>,
    max_pages: u32,
    page_size: Option<u32>,
}

impl AirtableClient {
    /// Builds a client for the base named in `config`.
    ///
    /// # Errors
    /// Returns [`StoreError::Config`] for invalid settings and
    /// [`StoreError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: &RecordStoreConfig) -> Result<Self, StoreError> {
        config.validate()?;

        let mut base = Url::parse(&config.base_url)
            .map_err(|e| StoreError::config(format!("base_url: {e}")))?;
        base.path_segments_mut()
            .map_err(|()| StoreError::config("base_url: must be a hierarchical URL"))?
            .pop_if_empty()
            .push(config.base_id.trim());

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http,
            base,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            max_pages: config.max_pages,
            page_size: config.page_size,
        })
    }

    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::config("base_url: must be a hierarchical URL"))?
            .push(table);
        Ok(url)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key.expose()),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, StoreError> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Pulls `error.message` / `error.type` / `error` out of an error body.
fn error_message(body: &[u8]) -> String {
    let from_json = serde_json::from_slice::<Value>(body).ok().and_then(|v| {
        let err = v.get("error")?;
        err.get("message")
            .or_else(|| err.get("type"))
            .unwrap_or(err)
            .as_str()
            .map(str::to_owned)
    });

    from_json.unwrap_or_else(|| {
        String::from_utf8_lossy(body)
            .chars()
            .take(ERROR_PREVIEW_CHARS)
            .collect()
    })
}

#[async_trait]
impl RecordStore for AirtableClient {
    #[instrument(skip_all, fields(table = %table, records = tracing::field::Empty))]
    async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Record>, StoreError> {
        let url = self.table_url(table)?;
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        for page_no in 1..=self.max_pages {
            let params = query.to_params(self.page_size, offset.as_deref());
            let page: ListPage = self.send(self.http.get(url.clone()).query(&params)).await?;
            records.extend(page.records);

            match page.offset {
                Some(next) if page_no < self.max_pages => offset = Some(next),
                Some(_) => {
                    debug!(pages = self.max_pages, "page limit reached; remaining records not read");
                    break;
                }
                None => break,
            }
        }

        tracing::Span::current().record("records", records.len());
        Ok(records)
    }

    #[instrument(skip_all, fields(table = %table, count = records.len()))]
    async fn create(&self, table: &str, records: Vec<FieldMap>) -> Result<Vec<Record>, StoreError> {
        let url = self.table_url(table)?;
        let mut created = Vec::with_capacity(records.len());

        for chunk in records.chunks(CREATE_BATCH) {
            let body = CreateBody {
                records: chunk.iter().map(|fields| NewRecord { fields }).collect(),
                typecast: false,
            };
            let batch: CreatedRecords = self.send(self.http.post(url.clone()).json(&body)).await?;
            created.extend(batch.records);
        }

        debug!(created = created.len(), "records created");
        Ok(created)
    }
}
