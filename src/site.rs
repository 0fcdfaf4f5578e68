//! Composition of both pipelines behind the site's routes.
use serde::Serialize;
use tracing::instrument;

use crate::config::{CategoryJoin, Config};
use crate::posts::PostService;
use crate::projects::ProjectService;
use crate::route::Route;
use crate::supabase::{RowService, StoreError, SupabaseClient};
use crate::view::{PostView, ProjectView};

/// Data a page needs before it renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", content = "data", rename_all = "snake_case")]
pub enum Page {
    Landing,
    About,
    Writing(Vec<PostView>),
    Projects(Vec<ProjectView>),
    /// `None` renders the "Post not found" state with a link back to `/writing`.
    Post(Option<PostView>),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct Site<S> {
    pub posts: PostService<S>,
    pub projects: ProjectService<S>,
}

impl Site<SupabaseClient> {
    pub fn from_config(cfg: &Config) -> Result<Self, StoreError> {
        let client = SupabaseClient::from_config(cfg)?;
        Ok(Self::new(client, cfg.supabase.category_join))
    }
}

impl<S: RowService + Clone> Site<S> {
    pub fn new(store: S, join: CategoryJoin) -> Self {
        Self {
            posts: PostService::new(store.clone(), join),
            projects: ProjectService::new(store),
        }
    }

    #[instrument(skip(self))]
    pub async fn load(&self, path: &str) -> Page {
        match Route::resolve(path) {
            Route::Landing => Page::Landing,
            Route::About => Page::About,
            Route::Writing => Page::Writing(self.posts.list_posts().await),
            Route::Projects => Page::Projects(self.projects.list_projects().await),
            Route::Post(slug) => Page::Post(self.posts.get_post_by_slug(&slug).await),
            Route::NotFound => Page::NotFound,
        }
    }
}
