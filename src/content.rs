//! Text assembly for post views: preview, full content and display dates.
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#+\s+").expect("valid heading regex"));
static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").expect("valid newline regex"));

pub const PREVIEW_MAX_CHARS: usize = 200;
pub const ELLIPSIS: &str = "...";
pub const DATE_UNAVAILABLE: &str = "Date unavailable";

/// Short description for listings.
///
/// A non-blank `preview` wins (trimmed). Otherwise the body is flattened to a
/// single line without heading markers and cut to [`PREVIEW_MAX_CHARS`]
/// characters plus [`ELLIPSIS`].
pub fn preview_text(preview: Option<&str>, body: Option<&str>) -> String {
    if let Some(preview) = preview.map(str::trim).filter(|p| !p.is_empty()) {
        return preview.to_string();
    }
    let Some(body) = body.filter(|b| !b.is_empty()) else {
        return String::new();
    };

    let without_headings = HEADING_MARKERS.replace_all(body, "");
    let flattened = NEWLINE_RUNS.replace_all(&without_headings, " ");
    let clean = flattened.trim();

    if clean.chars().count() > PREVIEW_MAX_CHARS {
        let cut: String = clean.chars().take(PREVIEW_MAX_CHARS).collect();
        format!("{}{}", cut, ELLIPSIS)
    } else {
        clean.to_string()
    }
}

/// Article text: subheader and body separated by a blank line, whichever of
/// the two exist.
pub fn full_content(subheader: Option<&str>, body: Option<&str>) -> String {
    let subheader = subheader.filter(|s| !s.is_empty());
    let body = body.filter(|b| !b.is_empty());
    match (subheader, body) {
        (Some(s), Some(b)) => format!("{}\n\n{}", s, b),
        (Some(s), None) => s.to_string(),
        (None, Some(b)) => b.to_string(),
        (None, None) => String::new(),
    }
}

/// "January 2024", used on listings.
pub fn listing_date(created_at: Option<&DateTime<Utc>>) -> String {
    created_at
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| DATE_UNAVAILABLE.to_string())
}

/// "January 15, 2024", used on the article view.
pub fn detail_date(created_at: Option<&DateTime<Utc>>) -> String {
    created_at
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| DATE_UNAVAILABLE.to_string())
}
