//! Post categories: normalization of free-text store labels into the fixed
//! site vocabulary and selection of a single primary category.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technology,
    Finance,
    Personal,
    Mixed,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category '{0}' (expected technology, finance, personal or mixed)")]
pub struct ParseCategoryError(pub String);

impl Category {
    /// Filter-bar order on the writing page.
    pub const ALL: [Category; 4] = [
        Category::Mixed,
        Category::Technology,
        Category::Finance,
        Category::Personal,
    ];

    /// Map a raw store label onto the site vocabulary. Unknown labels are
    /// `Mixed`; this never fails.
    pub fn normalize(raw: &str) -> Category {
        match raw.trim().to_lowercase().as_str() {
            "tech" | "technology" => Category::Technology,
            "finance" | "financial" => Category::Finance,
            "personal" => Category::Personal,
            "mixed" | "general" => Category::Mixed,
            _ => Category::Mixed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Finance => "finance",
            Category::Personal => "personal",
            Category::Mixed => "mixed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Finance => "Finance",
            Category::Personal => "Personal",
            Category::Mixed => "Mixed",
        }
    }

    /// Badge colour as a CSS hex string.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Technology => "#1976D2",
            Category::Finance => "#7B1FA2",
            Category::Personal => "#FF9800",
            Category::Mixed => "#757575",
        }
    }

    pub fn is_specific(&self) -> bool {
        *self != Category::Mixed
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse of the canonical names, for user input. Store labels go
/// through [`Category::normalize`] instead.
impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technology" => Ok(Category::Technology),
            "finance" => Ok(Category::Finance),
            "personal" => Ok(Category::Personal),
            "mixed" => Ok(Category::Mixed),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

/// Pick the category shown in compact contexts.
///
/// No categories gives `Mixed`, a single one is used as is, and with several
/// the first non-mixed one in join order wins. The result depends on input
/// order.
pub fn primary_category(categories: &[Category]) -> Category {
    match categories {
        [] => Category::Mixed,
        [only] => *only,
        many => many
            .iter()
            .copied()
            .find(Category::is_specific)
            .unwrap_or(Category::Mixed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Category::*;

    #[test]
    fn normalize_synonym_table() {
        let table = [
            ("tech", Technology),
            ("technology", Technology),
            ("finance", Finance),
            ("financial", Finance),
            ("personal", Personal),
            ("mixed", Mixed),
            ("general", Mixed),
        ];
        for (raw, expected) in table {
            assert_eq!(Category::normalize(raw), expected, "label {raw:?}");
        }
    }

    #[test]
    fn normalize_ignores_case_and_whitespace() {
        assert_eq!(Category::normalize("  Tech  "), Technology);
        assert_eq!(Category::normalize("FINANCIAL"), Finance);
        assert_eq!(Category::normalize("\tGeneral\n"), Mixed);
    }

    #[test]
    fn normalize_unknown_is_mixed() {
        for raw in ["", "   ", "travel", "tech stuff", "financ"] {
            assert_eq!(Category::normalize(raw), Mixed, "label {raw:?}");
        }
    }

    #[test]
    fn normalize_is_idempotent_on_canonical_values() {
        for c in Category::ALL {
            assert_eq!(Category::normalize(c.as_str()), c);
            assert_eq!(
                Category::normalize(Category::normalize(c.as_str()).as_str()),
                Category::normalize(c.as_str())
            );
        }
    }

    #[test]
    fn primary_category_tie_breaks() {
        assert_eq!(primary_category(&[]), Mixed);
        assert_eq!(primary_category(&[Finance]), Finance);
        assert_eq!(primary_category(&[Mixed]), Mixed);
        assert_eq!(primary_category(&[Mixed, Technology]), Technology);
        assert_eq!(primary_category(&[Mixed, Mixed]), Mixed);
        assert_eq!(primary_category(&[Personal, Finance]), Personal);
        assert_eq!(primary_category(&[Finance, Personal]), Finance);
    }

    #[test]
    fn strict_parse_rejects_synonyms() {
        assert_eq!("Technology".parse::<Category>(), Ok(Technology));
        assert_eq!(" mixed ".parse::<Category>(), Ok(Mixed));
        assert!("tech".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Technology).unwrap(), "\"technology\"");
        let parsed: Category = serde_json::from_str("\"finance\"").unwrap();
        assert_eq!(parsed, Finance);
    }
}
