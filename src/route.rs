//! Mapping of request paths onto site pages.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    About,
    Writing,
    Projects,
    /// Candidate post slug, resolved by lookup.
    Post(String),
    NotFound,
}

impl Route {
    pub fn resolve(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Route::Landing;
        }

        let mut segments = trimmed.split('/');
        let first = segments.next().unwrap_or_default();
        let nested = segments.next().is_some();
        match first {
            "writing" => Route::Writing,
            "about" if !nested => Route::About,
            "projects" if !nested => Route::Projects,
            _ if nested => Route::NotFound,
            slug => Route::Post(slug.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".into(),
            Route::About => "/about".into(),
            Route::Writing => "/writing".into(),
            Route::Projects => "/projects".into(),
            Route::Post(slug) => format!("/{}", slug),
            Route::NotFound => "/".into(),
        }
    }
}
