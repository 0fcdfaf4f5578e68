//! PostgREST query-string builder.
//!
//! Only the read subset the site needs: column selection (with embedded
//! relations), equality / null filters, newest-first ordering and a row limit.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq { column: String, value: String },
    NotNull { column: String },
    /// `column IS NULL OR column = ''`
    NullOrEmpty { column: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub select: String,
    pub filters: Vec<Filter>,
    /// Column sorted descending.
    pub order_desc: Option<String>,
    pub limit: Option<usize>,
}

impl Default for Query {
    fn default() -> Self {
        Self::select("*")
    }
}

impl Query {
    pub fn select(columns: impl Into<String>) -> Self {
        Self {
            select: columns.into(),
            filters: Vec::new(),
            order_desc: None,
            limit: None,
        }
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn not_null(mut self, column: impl Into<String>) -> Self {
        self.filters.push(Filter::NotNull {
            column: column.into(),
        });
        self
    }

    pub fn null_or_empty(mut self, column: impl Into<String>) -> Self {
        self.filters.push(Filter::NullOrEmpty {
            column: column.into(),
        });
        self
    }

    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order_desc = Some(column.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query pairs in the order PostgREST expects them; values are not yet
    /// percent-encoded.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), compact_select(&self.select))];
        for filter in &self.filters {
            match filter {
                Filter::Eq { column, value } => {
                    pairs.push((column.clone(), format!("eq.{}", value)))
                }
                Filter::NotNull { column } => pairs.push((column.clone(), "not.is.null".into())),
                Filter::NullOrEmpty { column } => pairs.push((
                    "or".into(),
                    format!("({}.is.null,{}.eq.)", column, column),
                )),
            }
        }
        if let Some(column) = &self.order_desc {
            pairs.push(("order".into(), format!("{}.desc", column)));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".into(), limit.to_string()));
        }
        pairs
    }
}

// Multi-line select lists are convenient to write but PostgREST rejects
// embedded whitespace.
fn compact_select(select: &str) -> String {
    select.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn default_selects_everything() {
        assert_eq!(Query::default().to_pairs(), vec![pair("select", "*")]);
    }

    #[test]
    fn builds_filters_order_and_limit() {
        let q = Query::select("id,title")
            .not_null("slug")
            .eq("id", "42")
            .order_desc("created_at")
            .limit(1);
        assert_eq!(
            q.to_pairs(),
            vec![
                pair("select", "id,title"),
                pair("slug", "not.is.null"),
                pair("id", "eq.42"),
                pair("order", "created_at.desc"),
                pair("limit", "1"),
            ]
        );
    }

    #[test]
    fn null_or_empty_uses_or_group() {
        let q = Query::default().null_or_empty("slug").order_desc("created_at");
        assert_eq!(
            q.to_pairs(),
            vec![
                pair("select", "*"),
                pair("or", "(slug.is.null,slug.eq.)"),
                pair("order", "created_at.desc"),
            ]
        );
    }

    #[test]
    fn select_whitespace_is_removed() {
        let q = Query::select(
            "id,
             post_categories (
               categories ( id, name )
             )",
        );
        assert_eq!(
            q.to_pairs()[0],
            pair("select", "id,post_categories(categories(id,name))")
        );
    }
}
