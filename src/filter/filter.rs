use std::collections::HashMap;

use serde_json::Value;

use super::descriptor::{AllowedFilter, QueryDescriptor};
use super::error::FilterError;
use super::filter_page::FilterPage;
use super::filter_where::SqlBuilder;
use super::types::{FilterOp, Page, SortDirection, SqlResult, ValueKind};

/// A query descriptor bound to one request: subject scope, filter values and page.
pub struct Filter<'d> {
    descriptor: &'d QueryDescriptor,
    subject: Option<Value>,
    values: Vec<(&'d AllowedFilter, Value)>,
    page: Page,
}

impl<'d> Filter<'d> {
    pub fn new(descriptor: &'d QueryDescriptor) -> Result<Self, FilterError> {
        descriptor.validate()?;
        Ok(Self {
            descriptor,
            subject: None,
            values: vec![],
            page: Page { limit: descriptor.default_limit.max(1), offset: None },
        })
    }

    /// Bind the owning subject; it always becomes `$1`.
    pub fn scope(&mut self, subject: impl Into<Value>) -> &mut Self {
        self.subject = Some(subject.into());
        self
    }

    /// Pull allow-listed filters and pagination out of the request query.
    ///
    /// Values are taken in descriptor order so identical requests produce
    /// identical statements. Unknown keys are ignored; empty values count as
    /// absent.
    pub fn assign(
        &mut self,
        params: &HashMap<String, String>,
        max_limit: i64,
        debug_logging: bool,
    ) -> Result<&mut Self, FilterError> {
        self.values.clear();
        for allowed in self.descriptor.filters {
            let raw = params.get(allowed.key).map(|v| v.trim()).filter(|v| !v.is_empty());
            match raw {
                Some(raw) => {
                    let value = Self::convert(allowed, raw)?;
                    self.values.push((allowed, value));
                }
                None if allowed.required => return Err(FilterError::MissingParameter(allowed.key)),
                None => {}
            }
        }

        self.page = FilterPage::resolve(
            params,
            self.descriptor.default_limit,
            self.descriptor.effective_max_limit(max_limit),
            self.descriptor.allow_offset,
            debug_logging,
        );
        Ok(self)
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Value bound for `key`, if the request supplied it.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.iter().find(|(f, _)| f.key == key).map(|(_, v)| v)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let d = self.descriptor;
        let mut builder = SqlBuilder::select(d.relation, d.columns);

        if let Some(scope_column) = d.scope_column {
            let subject = self.subject.clone().ok_or(FilterError::MissingScope(d.relation))?;
            builder.add_filter(scope_column, FilterOp::Eq, subject);
        }

        for (allowed, value) in &self.values {
            builder.add_filter(allowed.column, allowed.op, value.clone());
        }

        builder
            .order_by(d.sort_column, SortDirection::Desc)
            .paginate(self.page);

        Ok(builder.build())
    }

    fn convert(allowed: &AllowedFilter, raw: &str) -> Result<Value, FilterError> {
        match allowed.kind {
            ValueKind::Text => Ok(Value::from(raw)),
            ValueKind::Integer => raw.parse::<i64>().map(Value::from).map_err(|_| FilterError::InvalidValue {
                key: allowed.key,
                value: raw.to_string(),
            }),
        }
    }
}
