use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::Config;

pub mod query;

pub use query::Query;

/// PostgREST error code for "could not find a relationship between tables".
const MISSING_RELATIONSHIP_CODE: &str = "PGRST200";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store error {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid store response JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    /// True when the store could not embed a related table, meaning the joined
    /// select is unavailable and related rows must be fetched separately.
    pub fn is_missing_relationship(&self) -> bool {
        match self {
            StoreError::Status { body, .. } => body.contains(MISSING_RELATIONSHIP_CODE),
            _ => false,
        }
    }
}

/// Read access to the hosted row store.
#[async_trait]
pub trait RowService: Send + Sync {
    /// Fetch rows of `table` matching `query`, in the order the store returns them.
    async fn fetch_rows(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Fetch join rows of `table` whose `foreign_key` equals `value`.
    async fn fetch_related(
        &self,
        table: &str,
        foreign_key: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError> {
        let query = Query::default().eq(foreign_key, value);
        self.fetch_rows(table, &query).await
    }
}

#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    rest_url: Url,
    anon_key: String,
    schema: String,
}

impl fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("rest_url", &self.rest_url)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    pub fn new(url: &str, anon_key: String) -> Result<Self, StoreError> {
        Self::with_options(url, anon_key, "public".into(), Duration::from_secs(10))
    }

    pub fn from_config(cfg: &Config) -> Result<Self, StoreError> {
        Self::with_options(
            &cfg.supabase.url,
            cfg.supabase.anon_key.clone(),
            cfg.supabase.schema.clone(),
            Duration::from_secs(cfg.supabase.timeout_seconds),
        )
    }

    pub fn with_options(
        url: &str,
        anon_key: String,
        schema: String,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let rest_url = rest_base(url)?;
        let http = Client::builder()
            .user_agent("folio/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            rest_url,
            anon_key,
            schema,
        })
    }

    pub fn build_request(&self, table: &str, query: &Query) -> Result<reqwest::Request, StoreError> {
        let mut endpoint = self
            .rest_url
            .join(table)
            .map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
        endpoint
            .query_pairs_mut()
            .extend_pairs(query.to_pairs());
        let request = self
            .http
            .get(endpoint)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Accept", "application/json")
            .header("Accept-Profile", &self.schema)
            .build()?;
        Ok(request)
    }

    async fn execute(&self, request: reqwest::Request) -> Result<Vec<Value>, StoreError> {
        debug!(method = %request.method(), url = %request.url(), "store request");
        for (name, value) in request.headers() {
            let lowered = name.as_str().to_ascii_lowercase();
            if lowered == "authorization" || lowered == "apikey" {
                trace!("  {}: [REDACTED]", name);
            } else {
                trace!("  {}: {}", name, value.to_str().unwrap_or("[invalid]"));
            }
        }

        let res = self.http.execute(request).await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, body = %body, "store returned an error");
            return Err(StoreError::Status { status, body });
        }

        let body = res.text().await?;
        trace!(bytes = body.len(), "store response body");
        let rows: Vec<Value> = serde_json::from_str(&body)?;
        debug!(rows = rows.len(), "store response");
        Ok(rows)
    }
}

#[async_trait]
impl RowService for SupabaseClient {
    async fn fetch_rows(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        let request = self.build_request(table, query)?;
        self.execute(request).await
    }
}

/// `https://x.supabase.co` (with or without a path or trailing slash) ->
/// `https://x.supabase.co/<path>/rest/v1/`.
fn rest_base(url: &str) -> Result<Url, StoreError> {
    let trimmed = url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    let base = Url::parse(&with_slash).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(StoreError::InvalidUrl(format!("{} cannot be a base URL", url)));
    }
    base.join("rest/v1/")
        .map_err(|e| StoreError::InvalidUrl(e.to_string()))
}
