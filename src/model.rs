//! Typed rows read from the hosted store.
//!
//! Store rows arrive as untyped JSON. Everything downstream works on the
//! structs here; `from_row` is the single place where a row is accepted,
//! defaulted or rejected.
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub const POSTS_TABLE: &str = "writing_posts";
pub const CATEGORIES_TABLE: &str = "categories";
pub const POST_CATEGORIES_TABLE: &str = "post_categories";
pub const PROJECTS_TABLE: &str = "projects";

#[derive(Debug, Error)]
pub enum RowError {
    #[error("malformed {table} row: {source}")]
    Malformed {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{table} row has no id")]
    MissingId { table: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCategory {
    pub id: i64,
    pub name: String,
}

/// One post/category association. Either side may be missing in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLink {
    pub post_id: Option<String>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredPost {
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub preview: Option<String>,
    pub subheader: Option<String>,
    pub body: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Categories in join-result order; dangling links already removed.
    pub categories: Vec<StoredCategory>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredProject {
    pub id: String,
    pub title: Option<String>,
    pub subheader: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub external_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Ids are uuids in some tables and integers in others.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> Option<String> {
        match self {
            RawId::Text(s) if s.trim().is_empty() => None,
            RawId::Text(s) => Some(s),
            RawId::Number(n) => Some(n.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct RawCategory {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct RawEmbeddedLink {
    #[serde(default)]
    categories: Option<RawCategory>,
}

#[derive(Deserialize)]
struct RawLink {
    #[serde(default)]
    post_id: Option<RawId>,
    #[serde(default)]
    category_id: Option<i64>,
}

#[derive(Deserialize)]
struct RawPost {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    preview: Option<String>,
    #[serde(default)]
    subheader: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    /// Parsed link by link so one bad entry does not reject the post.
    post_categories: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct RawProject {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subheader: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    tags: Option<Vec<Option<String>>>,
    #[serde(default)]
    external_url: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

impl RawCategory {
    /// Categories without a name are dangling and dropped.
    fn into_stored(self) -> Option<StoredCategory> {
        let name = self.name.filter(|n| !n.is_empty())?;
        Some(StoredCategory {
            id: self.id.unwrap_or_default(),
            name,
        })
    }
}

impl StoredCategory {
    pub fn from_row(row: Value) -> Result<Option<Self>, RowError> {
        let raw: RawCategory = serde_json::from_value(row).map_err(|source| RowError::Malformed {
            table: CATEGORIES_TABLE,
            source,
        })?;
        Ok(raw.into_stored())
    }
}

impl CategoryLink {
    pub fn from_row(row: Value) -> Result<Self, RowError> {
        let raw: RawLink = serde_json::from_value(row).map_err(|source| RowError::Malformed {
            table: POST_CATEGORIES_TABLE,
            source,
        })?;
        Ok(CategoryLink {
            post_id: raw.post_id.and_then(RawId::into_string),
            category_id: raw.category_id,
        })
    }
}

impl StoredPost {
    /// Parse a `writing_posts` row, including embedded
    /// `post_categories(categories(id, name))` when present.
    pub fn from_row(row: Value) -> Result<Self, RowError> {
        let raw: RawPost = serde_json::from_value(row).map_err(|source| RowError::Malformed {
            table: POSTS_TABLE,
            source,
        })?;
        let id = raw
            .id
            .and_then(RawId::into_string)
            .ok_or(RowError::MissingId { table: POSTS_TABLE })?;
        let categories = embedded_categories(&id, raw.post_categories.unwrap_or_default());

        Ok(StoredPost {
            id,
            title: raw.title,
            slug: raw.slug,
            preview: raw.preview,
            subheader: raw.subheader,
            body: raw.body,
            created_at: raw.created_at.as_deref().and_then(parse_timestamp),
            updated_at: raw.updated_at.as_deref().and_then(parse_timestamp),
            categories,
        })
    }
}

/// Categories from embedded `post_categories` links, in order. Null links,
/// links to a missing category and malformed links are dropped.
fn embedded_categories(post_id: &str, links: Vec<Value>) -> Vec<StoredCategory> {
    links
        .into_iter()
        .filter(|link| !link.is_null())
        .filter_map(|link| match serde_json::from_value::<RawEmbeddedLink>(link) {
            Ok(link) => link.categories,
            Err(err) => {
                warn!(post_id = %post_id, error = %err, "skipping malformed category link");
                None
            }
        })
        .filter_map(RawCategory::into_stored)
        .collect()
}

impl StoredProject {
    pub fn from_row(row: Value) -> Result<Self, RowError> {
        let raw: RawProject = serde_json::from_value(row).map_err(|source| RowError::Malformed {
            table: PROJECTS_TABLE,
            source,
        })?;
        let id = raw
            .id
            .and_then(RawId::into_string)
            .ok_or(RowError::MissingId {
                table: PROJECTS_TABLE,
            })?;
        Ok(StoredProject {
            id,
            title: raw.title,
            subheader: raw.subheader,
            date: raw.date,
            tags: raw
                .tags
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .collect(),
            external_url: raw.external_url,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}

/// Parse every row with `parse`, logging and skipping the ones it rejects.
pub fn parse_rows<T>(rows: Vec<Value>, parse: impl Fn(Value) -> Result<T, RowError>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match parse(row) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!(error = %err, "skipping malformed row");
                None
            }
        })
        .collect()
}

/// Postgres `timestamptz` comes back as RFC 3339; plain `timestamp` columns
/// have no offset and are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
