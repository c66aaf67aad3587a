use super::error::FilterError;
use super::types::{FilterOp, ValueKind};

/// One request key a handler accepts, and the column/operator it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedFilter {
    pub key: &'static str,
    pub column: &'static str,
    pub op: FilterOp,
    pub kind: ValueKind,
    pub required: bool,
}

impl AllowedFilter {
    pub const fn text(key: &'static str, column: &'static str) -> Self {
        Self { key, column, op: FilterOp::Eq, kind: ValueKind::Text, required: false }
    }

    pub const fn integer(key: &'static str, column: &'static str) -> Self {
        Self { key, column, op: FilterOp::Eq, kind: ValueKind::Integer, required: false }
    }

    pub const fn with_op(mut self, op: FilterOp) -> Self {
        self.op = op;
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Static, per-handler template for a filtered read.
#[derive(Debug, Clone, Copy)]
pub struct QueryDescriptor {
    pub relation: &'static str,
    pub columns: &'static [&'static str],
    /// Column holding the owning subject, when rows belong to a user.
    pub scope_column: Option<&'static str>,
    pub filters: &'static [AllowedFilter],
    /// Always sorted descending.
    pub sort_column: &'static str,
    pub default_limit: i64,
    /// Tighter cap than the configured global maximum, e.g. 1 for lookups.
    pub max_limit: Option<i64>,
    pub allow_offset: bool,
}

impl QueryDescriptor {
    pub fn validate(&self) -> Result<(), FilterError> {
        validate_identifier(self.relation)?;
        for column in self.columns {
            if *column != "*" {
                validate_identifier(column)?;
            }
        }
        if let Some(scope) = self.scope_column {
            validate_identifier(scope)?;
        }
        for filter in self.filters {
            validate_identifier(filter.column)?;
        }
        validate_identifier(self.sort_column)
    }

    pub fn effective_max_limit(&self, configured_max: i64) -> i64 {
        match self.max_limit {
            Some(local) => local.min(configured_max),
            None => configured_max,
        }
    }
}

/// Accepts `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_identifier(name: &str) -> Result<(), FilterError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(FilterError::InvalidIdentifier(name.to_string()))
    }
}
