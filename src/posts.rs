//! Post pipeline: store rows -> [`PostView`].
//!
//! The `list_*`/`get_*` methods are what pages call; they never fail and
//! degrade to an empty list or `None`, logging the cause. The `fetch_*` twins
//! return the underlying [`StoreError`] for tooling.
use futures::future::join_all;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};

use crate::config::CategoryJoin;
use crate::model::{
    parse_rows, CategoryLink, StoredCategory, StoredPost, CATEGORIES_TABLE, POSTS_TABLE,
    POST_CATEGORIES_TABLE,
};
use crate::slug::resolve_slug;
use crate::supabase::{Query, RowService, StoreError};
use crate::view::PostView;

const POST_COLUMNS: &str = "id, title, slug, preview, subheader, body, created_at, updated_at";
const CATEGORY_EMBED: &str = "post_categories ( categories ( id, name ) )";

#[derive(Debug, Clone)]
pub struct PostService<S> {
    store: S,
    join: CategoryJoin,
}

impl<S: RowService> PostService<S> {
    pub fn new(store: S, join: CategoryJoin) -> Self {
        Self { store, join }
    }

    /// Published posts (those with a stored slug), newest first.
    #[instrument(skip_all)]
    pub async fn list_posts(&self) -> Vec<PostView> {
        match self.fetch_posts().await {
            Ok(posts) => posts,
            Err(err) => {
                error!(error = %err, "failed to fetch posts");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get_post_by_slug(&self, slug: &str) -> Option<PostView> {
        match self.fetch_post_by_slug(slug).await {
            Ok(post) => post,
            Err(err) => {
                error!(error = %err, "failed to fetch post by slug");
                None
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get_post_by_id(&self, id: &str) -> Option<PostView> {
        match self.fetch_post_by_id(id).await {
            Ok(post) => post,
            Err(err) => {
                error!(error = %err, "failed to fetch post by id");
                None
            }
        }
    }

    pub async fn fetch_posts(&self) -> Result<Vec<PostView>, StoreError> {
        let query = Query::default().not_null("slug").order_desc("created_at");
        let mut posts = self.fetch_stored(query).await?;
        // Stable, so equal or missing timestamps keep store order; None sorts last.
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let views: Vec<PostView> = posts.into_iter().map(to_view).collect();
        info!(count = views.len(), "fetched posts");
        Ok(views)
    }

    /// Stored slugs are matched first. Posts without one are addressed by the
    /// slug derived from their title, so those are searched next.
    pub async fn fetch_post_by_slug(&self, slug: &str) -> Result<Option<PostView>, StoreError> {
        let query = Query::default().eq("slug", slug).limit(1);
        let posts = self.fetch_stored(query).await?;
        if let Some(post) = posts.into_iter().next() {
            return Ok(Some(to_view(post)));
        }

        let query = Query::default().null_or_empty("slug").order_desc("created_at");
        let unslugged = self.fetch_stored(query).await?;
        debug!(candidates = unslugged.len(), "no stored slug match; trying derived slugs");
        Ok(unslugged
            .into_iter()
            .find(|post| resolve_slug(post.slug.as_deref(), post.title.as_deref()) == slug)
            .map(to_view))
    }

    pub async fn fetch_post_by_id(&self, id: &str) -> Result<Option<PostView>, StoreError> {
        let query = Query::default().eq("id", id).limit(1);
        let posts = self.fetch_stored(query).await?;
        Ok(posts.into_iter().next().map(to_view))
    }

    async fn fetch_stored(&self, query: Query) -> Result<Vec<StoredPost>, StoreError> {
        match self.join {
            CategoryJoin::Embedded => self.fetch_embedded(query).await,
            CategoryJoin::PerPost => self.fetch_per_post(query).await,
            CategoryJoin::Auto => match self.fetch_embedded(query.clone()).await {
                Err(err) if err.is_missing_relationship() => {
                    warn!(error = %err, "category join unavailable; fetching categories per post");
                    self.fetch_per_post(query).await
                }
                other => other,
            },
        }
    }

    async fn fetch_embedded(&self, mut query: Query) -> Result<Vec<StoredPost>, StoreError> {
        query.select = format!("{}, {}", POST_COLUMNS, CATEGORY_EMBED);
        let rows = self.store.fetch_rows(POSTS_TABLE, &query).await?;
        Ok(parse_rows(rows, StoredPost::from_row))
    }

    /// Posts without the embed, then the category table once and one join
    /// request per post, issued together and matched back by post id.
    async fn fetch_per_post(&self, mut query: Query) -> Result<Vec<StoredPost>, StoreError> {
        query.select = POST_COLUMNS.to_string();
        let rows = self.store.fetch_rows(POSTS_TABLE, &query).await?;
        let posts = parse_rows(rows, StoredPost::from_row);
        if posts.is_empty() {
            return Ok(posts);
        }

        let category_rows = self
            .store
            .fetch_rows(CATEGORIES_TABLE, &Query::select("id, name"))
            .await?;
        let categories: HashMap<i64, StoredCategory> = category_rows
            .into_iter()
            .filter_map(|row| match StoredCategory::from_row(row) {
                Ok(category) => category,
                Err(err) => {
                    warn!(error = %err, "skipping malformed category row");
                    None
                }
            })
            .map(|c| (c.id, c))
            .collect();

        let store = &self.store;
        let lookups = posts.iter().map(|post| async move {
            let result = store
                .fetch_related(POST_CATEGORIES_TABLE, "post_id", &post.id)
                .await;
            (post.id.clone(), result)
        });
        let mut by_post: HashMap<String, Vec<StoredCategory>> = HashMap::new();
        for (post_id, result) in join_all(lookups).await {
            match result {
                Ok(rows) => {
                    let linked = link_categories(&post_id, rows, &categories);
                    by_post.insert(post_id, linked);
                }
                Err(err) => {
                    warn!(post_id = %post_id, error = %err, "failed to fetch post categories");
                }
            }
        }

        Ok(posts
            .into_iter()
            .map(|post| {
                let categories = by_post.get(&post.id).cloned().unwrap_or_default();
                StoredPost { categories, ..post }
            })
            .collect())
    }
}

/// Resolve join rows for `post_id` against the category table, dropping
/// links with a missing or unknown side.
fn link_categories(
    post_id: &str,
    rows: Vec<Value>,
    categories: &HashMap<i64, StoredCategory>,
) -> Vec<StoredCategory> {
    parse_rows(rows, CategoryLink::from_row)
        .into_iter()
        .filter(|link| link.post_id.as_deref() == Some(post_id))
        .filter_map(|link| link.category_id)
        .filter_map(|id| categories.get(&id).cloned())
        .collect()
}

fn to_view(post: StoredPost) -> PostView {
    let view = PostView::from_stored(post);
    debug!(
        id = %view.id,
        slug = %view.slug,
        primary = %view.primary_category,
        categories = ?view.all_categories,
        "transformed post"
    );
    view
}
