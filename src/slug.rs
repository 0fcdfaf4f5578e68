//! URL slugs for post detail routes.
use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("valid slug regex"));
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("valid hyphen regex"));

const FALLBACK_TITLE: &str = "untitled";

/// Lowercase `text`, drop everything except ASCII word characters, whitespace
/// and hyphens, then join words with single hyphens.
///
/// May return an empty string for input with no word characters.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RUNS.replace_all(stripped.trim(), "-");
    let collapsed = HYPHEN_RUNS.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// The route key for a post: the stored slug when present, otherwise one
/// derived from the title. Never empty.
pub fn resolve_slug(stored: Option<&str>, title: Option<&str>) -> String {
    if let Some(slug) = stored.filter(|s| !s.is_empty()) {
        return slug.to_string();
    }
    let title = title.filter(|t| !t.is_empty()).unwrap_or(FALLBACK_TITLE);
    let derived = slugify(title);
    if derived.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_slug_is_authoritative() {
        assert_eq!(resolve_slug(Some("my-post"), Some("Anything")), "my-post");
        assert_eq!(resolve_slug(Some("Keep_As-Is"), None), "Keep_As-Is");
    }

    #[test]
    fn derives_from_title_when_slug_missing_or_empty() {
        assert_eq!(resolve_slug(None, Some("Hello, World!")), "hello-world");
        assert_eq!(resolve_slug(Some(""), Some("Launch Day")), "launch-day");
    }

    #[test]
    fn falls_back_to_untitled() {
        assert_eq!(resolve_slug(None, Some("")), "untitled");
        assert_eq!(resolve_slug(None, None), "untitled");
        assert_eq!(resolve_slug(None, Some("!!! ???")), "untitled");
    }

    #[test]
    fn slugify_collapses_and_trims() {
        assert_eq!(slugify("  Rust   --  and  Money  "), "rust-and-money");
        assert_eq!(slugify("-leading and trailing-"), "leading-and-trailing");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
        assert_eq!(slugify("Q&A: 2024 edition"), "qa-2024-edition");
        assert_eq!(slugify("Café au lait"), "caf-au-lait");
    }

    #[test]
    fn slugify_is_stable() {
        let title = "Notes on Index Funds (Part 2)";
        assert_eq!(slugify(title), slugify(title));
        assert_eq!(slugify(title), "notes-on-index-funds-part-2");
    }
}
