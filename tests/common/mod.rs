#![allow(dead_code)]

use folio::supabase::query::Filter;
use folio::supabase::{Query, RowService, StoreError};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-memory stand-in for the hosted store. Applies `eq`, `not.is.null` and
/// null-or-empty filters and `limit`, but never sorts, so ordering is up to the caller.
/// Embedded `post_categories` are only returned when the select asks for them.
#[derive(Clone, Default)]
pub struct RecordingStore {
    tables: Arc<HashMap<String, Vec<Value>>>,
    failing: Arc<HashSet<String>>,
    no_embed: bool,
    calls: Arc<Mutex<Vec<(String, Query)>>>,
}

impl RecordingStore {
    pub fn with_tables(tables: Vec<(&str, Vec<Value>)>) -> Self {
        Self {
            tables: Arc::new(
                tables
                    .into_iter()
                    .map(|(name, rows)| (name.to_string(), rows))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    pub fn failing(mut self, table: &str) -> Self {
        let mut failing = (*self.failing).clone();
        failing.insert(table.to_string());
        self.failing = Arc::new(failing);
        self
    }

    pub fn without_embedding(mut self) -> Self {
        self.no_embed = true;
        self
    }

    pub async fn calls(&self) -> Vec<(String, Query)> {
        self.calls.lock().await.clone()
    }

    pub async fn calls_to(&self, table: &str) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|(t, _)| t == table)
            .count()
    }
}

fn cell_matches(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq { column, value } => match row.get(column) {
            Some(Value::String(s)) => s == value,
            Some(Value::Number(n)) => n.to_string() == *value,
            _ => false,
        },
        Filter::NotNull { column } => matches!(row.get(column), Some(v) if !v.is_null()),
        Filter::NullOrEmpty { column } => match row.get(column) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            _ => false,
        },
    }
}

#[async_trait::async_trait]
impl RowService for RecordingStore {
    async fn fetch_rows(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        self.calls
            .lock()
            .await
            .push((table.to_string(), query.clone()));

        if self.failing.contains(table) {
            return Err(StoreError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "connection reset".into(),
            });
        }
        let embeds = query.select.contains("post_categories");
        if embeds && self.no_embed {
            return Err(StoreError::Status {
                status: StatusCode::BAD_REQUEST,
                body: json!({
                    "code": "PGRST200",
                    "message": "Could not find a relationship between 'writing_posts' and 'post_categories'"
                })
                .to_string(),
            });
        }

        let mut rows: Vec<Value> = self
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|row| query.filters.iter().all(|f| cell_matches(row, f)))
            .collect();
        if !embeds {
            for row in &mut rows {
                if let Some(obj) = row.as_object_mut() {
                    obj.remove("post_categories");
                }
            }
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }
}

fn embed(categories: &[(i64, &str)]) -> Value {
    Value::Array(
        categories
            .iter()
            .map(|(id, name)| json!({ "categories": { "id": id, "name": name } }))
            .collect(),
    )
}

/// Posts, categories and join rows for a small blog. Rows are deliberately
/// not in date order.
pub fn blog_tables() -> Vec<(&'static str, Vec<Value>)> {
    let mut budget_links = embed(&[(2, "Finance"), (3, "Personal")]);
    // Link to a deleted category.
    budget_links
        .as_array_mut()
        .unwrap()
        .push(json!({ "categories": null }));

    vec![
        (
            "writing_posts",
            vec![
                json!({
                    "id": "p2",
                    "title": "Budget Basics",
                    "slug": "budget-basics",
                    "preview": "  How I track spending.  ",
                    "subheader": "A short guide",
                    "body": "## Step one\nWrite it down.",
                    "created_at": "2024-02-10T08:00:00+00:00",
                    "updated_at": null,
                    "post_categories": budget_links
                }),
                json!({
                    "id": "p4",
                    "title": null,
                    "slug": "old-notes",
                    "preview": null,
                    "subheader": null,
                    "body": null,
                    "created_at": null,
                    "updated_at": null,
                    "post_categories": []
                }),
                json!({
                    "id": "p1",
                    "title": "Launch Day",
                    "slug": null,
                    "preview": null,
                    "subheader": null,
                    "body": "# Intro\nWe shipped.",
                    "created_at": "2024-06-03T09:00:00+00:00",
                    "updated_at": null,
                    "post_categories": embed(&[(1, "Tech"), (4, "General")])
                }),
                json!({
                    "id": "p3",
                    "title": "Quiet Weekend",
                    "slug": "quiet-weekend",
                    "preview": null,
                    "subheader": null,
                    "body": "Nothing much.",
                    "created_at": "2024-05-01T18:30:00+00:00",
                    "updated_at": null,
                    "post_categories": embed(&[(4, "General")])
                }),
            ],
        ),
        (
            "categories",
            vec![
                json!({ "id": 1, "name": "Tech" }),
                json!({ "id": 2, "name": "Finance" }),
                json!({ "id": 3, "name": "Personal" }),
                json!({ "id": 4, "name": "General" }),
            ],
        ),
        (
            "post_categories",
            vec![
                json!({ "post_id": "p2", "category_id": 2 }),
                json!({ "post_id": "p1", "category_id": 1 }),
                json!({ "post_id": "p2", "category_id": 3 }),
                json!({ "post_id": "p2", "category_id": 99 }),
                json!({ "post_id": null, "category_id": 1 }),
                json!({ "post_id": "p1", "category_id": 4 }),
                json!({ "post_id": "p3", "category_id": 4 }),
            ],
        ),
    ]
}

pub fn project_tables() -> Vec<(&'static str, Vec<Value>)> {
    vec![(
        "projects",
        vec![
            json!({
                "id": 1,
                "title": "Ledger",
                "subheader": "Personal finance tracker",
                "date": "2023",
                "tags": ["rust", "sqlite"],
                "external_url": "https://example.com/ledger",
                "created_at": "2023-03-01T00:00:00+00:00"
            }),
            json!({
                "id": 2,
                "title": null,
                "created_at": "2024-08-20T00:00:00+00:00"
            }),
            json!({
                "id": 3,
                "title": "Site",
                "tags": null,
                "created_at": "2024-01-05T00:00:00+00:00"
            }),
            json!({ "title": "No id" }),
        ],
    )]
}
