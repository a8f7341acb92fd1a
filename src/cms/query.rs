//! Query and filter builders for the microCMS list API
//!
//! microCMS takes pagination and ordering as plain query-string parameters
//! (`limit`, `offset`, `orders` with a `-` prefix for descending) and a small
//! filter DSL in `filters`: `field[operator]value`, combined with `[and]` /
//! `[or]`.

use std::fmt;

/// A request for one page of entities from a CMS list endpoint
#[derive(Debug, Clone, Default)]
pub struct ContentQuery {
    limit: Option<usize>,
    offset: Option<usize>,
    orders: Vec<String>,
    filters: Option<String>,
    fields: Vec<String>,
    q: Option<String>,
    depth: Option<u8>,
}

impl ContentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Order ascending by a field
    pub fn order_asc(mut self, field: &str) -> Self {
        self.orders.push(field.to_string());
        self
    }

    /// Order descending by a field (`-field` on the wire)
    pub fn order_desc(mut self, field: &str) -> Self {
        self.orders.push(format!("-{}", field));
        self
    }

    /// Pass a raw `orders` spec through unchanged (API passthrough route)
    pub fn raw_orders(mut self, spec: impl Into<String>) -> Self {
        self.orders.push(spec.into());
        self
    }

    pub fn filters(mut self, filter: Filter) -> Self {
        self.filters = Some(filter.into_expr());
        self
    }

    /// Pass a raw filter expression through unchanged (API passthrough route)
    pub fn raw_filters(mut self, expr: impl Into<String>) -> Self {
        self.filters = Some(expr.into());
        self
    }

    pub fn field(mut self, name: &str) -> Self {
        self.fields.push(name.to_string());
        self
    }

    /// Full-text search parameter
    pub fn search(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn depth(mut self, depth: u8) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    /// Serialize into query-string pairs
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        if !self.orders.is_empty() {
            params.push(("orders", self.orders.join(",")));
        }
        if let Some(filters) = &self.filters {
            params.push(("filters", filters.clone()));
        }
        if !self.fields.is_empty() {
            params.push(("fields", self.fields.join(",")));
        }
        if let Some(q) = &self.q {
            params.push(("q", q.clone()));
        }
        if let Some(depth) = self.depth {
            params.push(("depth", depth.to_string()));
        }
        params
    }
}

/// A filter expression in the microCMS DSL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    expr: String,
}

impl Filter {
    pub fn equals(field: &str, value: &str) -> Self {
        Self {
            expr: format!("{}[equals]{}", field, value),
        }
    }

    pub fn not_equals(field: &str, value: &str) -> Self {
        Self {
            expr: format!("{}[not_equals]{}", field, value),
        }
    }

    pub fn contains(field: &str, value: &str) -> Self {
        Self {
            expr: format!("{}[contains]{}", field, value),
        }
    }

    /// The published-content guard every public listing carries
    pub fn published() -> Self {
        Self::equals("isPublished", "true")
    }

    pub fn and(mut self, other: Filter) -> Self {
        self.expr = format!("{}[and]{}", self.expr, other.expr);
        self
    }

    pub fn or(mut self, other: Filter) -> Self {
        self.expr = format!("{}[or]{}", self.expr, other.expr);
        self
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn into_expr(self) -> String {
        self.expr
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        let query = ContentQuery::new()
            .limit(8)
            .offset(16)
            .order_desc("publishedAt")
            .filters(Filter::published());

        let params = query.to_params();
        assert_eq!(
            params,
            vec![
                ("limit", "8".to_string()),
                ("offset", "16".to_string()),
                ("orders", "-publishedAt".to_string()),
                ("filters", "isPublished[equals]true".to_string()),
            ]
        );
    }

    #[test]
    fn test_multiple_orders() {
        let query = ContentQuery::new().order_asc("order").order_desc("createdAt");
        let params = query.to_params();
        assert_eq!(params, vec![("orders", "order,-createdAt".to_string())]);
    }

    #[test]
    fn test_empty_query_has_no_params() {
        assert!(ContentQuery::new().to_params().is_empty());
    }

    #[test]
    fn test_filter_combinators() {
        let filter = Filter::published()
            .and(Filter::contains("category.name", "frontend"))
            .and(Filter::not_equals("id", "abc"));
        assert_eq!(
            filter.expr(),
            "isPublished[equals]true[and]category.name[contains]frontend[and]id[not_equals]abc"
        );
    }

    #[test]
    fn test_filter_or() {
        let filter = Filter::contains("tags", "t1").or(Filter::contains("tags", "t2"));
        assert_eq!(filter.expr(), "tags[contains]t1[or]tags[contains]t2");
    }
}
