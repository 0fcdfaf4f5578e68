//! Read pipeline for a personal portfolio/blog site.
//!
//! Posts, their categories and projects live in a hosted Supabase database.
//! This crate reads those rows over PostgREST and turns them into the flat
//! view models the site's pages render.

pub mod category;
pub mod config;
pub mod content;
pub mod model;
pub mod posts;
pub mod projects;
pub mod route;
pub mod site;
pub mod slug;
pub mod supabase;
pub mod view;

pub use category::Category;
pub use posts::PostService;
pub use projects::ProjectService;
pub use site::{Page, Site};
pub use view::{PostView, ProjectView};
