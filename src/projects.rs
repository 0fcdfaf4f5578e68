//! Project pipeline: store rows -> [`ProjectView`].
use tracing::{error, info, instrument};

use crate::model::{parse_rows, parse_timestamp, StoredProject, PROJECTS_TABLE};
use crate::supabase::{Query, RowService, StoreError};
use crate::view::ProjectView;

#[derive(Debug, Clone)]
pub struct ProjectService<S> {
    store: S,
}

impl<S: RowService> ProjectService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All projects, newest first. Empty on failure.
    #[instrument(skip_all)]
    pub async fn list_projects(&self) -> Vec<ProjectView> {
        match self.fetch_projects().await {
            Ok(projects) => projects,
            Err(err) => {
                error!(error = %err, "failed to fetch projects");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get_project_by_id(&self, id: &str) -> Option<ProjectView> {
        match self.fetch_project_by_id(id).await {
            Ok(project) => project,
            Err(err) => {
                error!(error = %err, "failed to fetch project by id");
                None
            }
        }
    }

    pub async fn fetch_projects(&self) -> Result<Vec<ProjectView>, StoreError> {
        let query = Query::default().order_desc("created_at");
        let rows = self.store.fetch_rows(PROJECTS_TABLE, &query).await?;
        let mut projects = parse_rows(rows, StoredProject::from_row);
        projects.sort_by(|a, b| {
            let a = a.created_at.as_deref().and_then(parse_timestamp);
            let b = b.created_at.as_deref().and_then(parse_timestamp);
            b.cmp(&a)
        });
        let views: Vec<ProjectView> = projects.into_iter().map(ProjectView::from_stored).collect();
        info!(count = views.len(), "fetched projects");
        Ok(views)
    }

    pub async fn fetch_project_by_id(&self, id: &str) -> Result<Option<ProjectView>, StoreError> {
        let query = Query::default().eq("id", id).limit(1);
        let rows = self.store.fetch_rows(PROJECTS_TABLE, &query).await?;
        Ok(parse_rows(rows, StoredProject::from_row)
            .into_iter()
            .next()
            .map(ProjectView::from_stored))
    }
}
