//! View models handed to the site's pages, built fresh from stored rows on
//! every fetch.
use serde::Serialize;

use crate::category::{primary_category, Category};
use crate::content::{detail_date, full_content, listing_date, preview_text};
use crate::model::{StoredPost, StoredProject};
use crate::route::Route;
use crate::slug::resolve_slug;

pub const UNTITLED_POST: &str = "Untitled";
pub const UNTITLED_PROJECT: &str = "Untitled Project";

/// Badges shown next to a post on the writing list.
const LISTING_BADGE_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub primary_category: Category,
    /// "January 2024"
    pub display_date: String,
    /// "January 15, 2024"
    pub detail_date: String,
    pub preview_text: String,
    pub full_content: String,
    pub subheader: String,
    pub body: String,
    pub all_categories: Vec<Category>,
    pub listing_badges: ListingBadges,
    pub detail_badges: Vec<Badge>,
}

/// A category chip as rendered: display label and CSS colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub category: Category,
    pub label: &'static str,
    pub color: &'static str,
}

impl From<Category> for Badge {
    fn from(category: Category) -> Self {
        Badge {
            category,
            label: category.label(),
            color: category.color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingBadges {
    pub shown: Vec<Badge>,
    /// Rendered as "+N more" when non-zero.
    pub overflow: usize,
}

impl PostView {
    pub fn from_stored(post: StoredPost) -> Self {
        let all_categories: Vec<Category> = post
            .categories
            .iter()
            .map(|c| Category::normalize(&c.name))
            .collect();
        let primary = primary_category(&all_categories);
        let slug = resolve_slug(post.slug.as_deref(), post.title.as_deref());

        PostView {
            preview_text: preview_text(post.preview.as_deref(), post.body.as_deref()),
            full_content: full_content(post.subheader.as_deref(), post.body.as_deref()),
            display_date: listing_date(post.created_at.as_ref()),
            detail_date: detail_date(post.created_at.as_ref()),
            title: post.title.filter(|t| !t.is_empty()).unwrap_or_else(|| UNTITLED_POST.into()),
            subheader: post.subheader.unwrap_or_default(),
            body: post.body.unwrap_or_default(),
            id: post.id,
            slug,
            primary_category: primary,
            listing_badges: listing_badges(&all_categories, primary),
            detail_badges: detail_badges(&all_categories),
            all_categories,
        }
    }

    /// Path of the post's detail page.
    pub fn href(&self) -> String {
        Route::Post(self.slug.clone()).path()
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.all_categories.contains(&category)
    }
}

/// First two categories and how many were left out; the primary category
/// alone when the post has none.
fn listing_badges(categories: &[Category], primary: Category) -> ListingBadges {
    if categories.is_empty() {
        return ListingBadges {
            shown: vec![primary.into()],
            overflow: 0,
        };
    }
    let shown: Vec<Badge> = categories
        .iter()
        .take(LISTING_BADGE_LIMIT)
        .map(|&c| Badge::from(c))
        .collect();
    ListingBadges {
        overflow: categories.len() - shown.len(),
        shown,
    }
}

/// Specific categories for the article header; none when only `mixed` is
/// attached.
fn detail_badges(categories: &[Category]) -> Vec<Badge> {
    categories
        .iter()
        .copied()
        .filter(Category::is_specific)
        .map(Badge::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectView {
    pub id: String,
    pub title: String,
    pub subheader: String,
    pub date: String,
    pub tags: Vec<String>,
    pub external_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ProjectView {
    pub fn from_stored(project: StoredProject) -> Self {
        ProjectView {
            id: project.id,
            title: project
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED_PROJECT.into()),
            subheader: project.subheader.unwrap_or_default(),
            date: project.date.unwrap_or_default(),
            tags: project.tags,
            external_url: project.external_url.unwrap_or_default(),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Posts carrying `selected`, or every post when nothing is selected.
pub fn filter_by_category(posts: &[PostView], selected: Option<Category>) -> Vec<PostView> {
    match selected {
        None => posts.to_vec(),
        Some(category) => posts
            .iter()
            .filter(|p| p.has_category(category))
            .cloned()
            .collect(),
    }
}

/// Category selection on the writing list. Starts on `mixed`; clicking the
/// active category clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFilter {
    selected: Option<Category>,
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            selected: Some(Category::Mixed),
        }
    }
}

impl CategoryFilter {
    pub fn new(selected: Option<Category>) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> Option<Category> {
        self.selected
    }

    pub fn toggle(&mut self, clicked: Category) {
        self.selected = if self.selected == Some(clicked) {
            None
        } else {
            Some(clicked)
        };
    }

    pub fn apply(&self, posts: &[PostView]) -> Vec<PostView> {
        filter_by_category(posts, self.selected)
    }

    /// Message for an empty result.
    pub fn empty_message(&self) -> &'static str {
        if self.selected.is_some() {
            "No posts found in this category."
        } else {
            "No posts available."
        }
    }
}
