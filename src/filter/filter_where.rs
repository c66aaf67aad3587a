use serde_json::Value;

use super::types::{FilterOp, Page, SortDirection, SqlResult};

/// Incremental builder for a single parameterized SELECT.
///
/// Identifiers are `&'static str` so only names compiled into the binary can
/// reach the statement text; every runtime value goes through [`Self::param`]
/// and is bound positionally. The placeholder counter lives here and nowhere
/// else.
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    relation: &'static str,
    projection: String,
    conditions: Vec<String>,
    params: Vec<Value>,
    order: Option<(&'static str, SortDirection)>,
    page: Option<Page>,
}

impl SqlBuilder {
    /// Start a statement that yields one JSON object per row in a column named `row`.
    /// `["*"]` selects the whole row.
    pub fn select(relation: &'static str, columns: &[&'static str]) -> Self {
        let projection = if columns.is_empty() || columns.contains(&"*") {
            format!("row_to_json(\"{}\")", relation)
        } else {
            let pairs: Vec<String> = columns
                .iter()
                .map(|c| format!("'{}', \"{}\"", c, c))
                .collect();
            format!("json_build_object({})", pairs.join(", "))
        };

        Self {
            relation,
            projection,
            conditions: vec![],
            params: vec![],
            order: None,
            page: None,
        }
    }

    pub fn add_filter(&mut self, column: &'static str, op: FilterOp, value: impl Into<Value>) -> &mut Self {
        let placeholder = self.param(value.into());
        self.conditions.push(format!("\"{}\" {} {}", column, op.to_sql(), placeholder));
        self
    }

    pub fn order_by(&mut self, column: &'static str, direction: SortDirection) -> &mut Self {
        self.order = Some((column, direction));
        self
    }

    pub fn paginate(&mut self, page: Page) -> &mut Self {
        self.page = Some(page);
        self
    }

    /// Number of values bound so far.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn build(mut self) -> SqlResult {
        let mut parts = vec![format!("SELECT {} AS row FROM \"{}\"", self.projection, self.relation)];

        if !self.conditions.is_empty() {
            parts.push(format!("WHERE {}", self.conditions.join(" AND ")));
        }

        if let Some((column, direction)) = self.order {
            parts.push(format!("ORDER BY \"{}\" {}", column, direction.to_sql()));
        }

        // LIMIT/OFFSET are bound last so their placeholders follow every filter
        if let Some(page) = self.page {
            let limit = self.param(Value::from(page.limit));
            parts.push(format!("LIMIT {}", limit));
            if let Some(offset) = page.offset {
                let offset = self.param(Value::from(offset));
                parts.push(format!("OFFSET {}", offset));
            }
        }

        SqlResult {
            query: parts.join(" "),
            params: self.params,
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }
}
