use tracing::debug;

use super::sort::parse_sort;
use super::value::split_assignment;
use super::{FilterWindow, ParamError, ParamValue, QueryParams, SearchCondition, DEFAULT_LIMIT};
use crate::config::SearchDefaults;

/// Accumulates named parameters, paging and a raw sort string for one search.
///
/// Every method takes the builder by value, so a builder is single-use and
/// `build()` hands its parameter map over to the condition.
#[derive(Debug, Clone)]
pub struct SearchConditionBuilder {
    offset: usize,
    limit: usize,
    sort: String,
    query_params: QueryParams,
}

impl Default for SearchConditionBuilder {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
            sort: String::new(),
            query_params: QueryParams::new(),
        }
    }
}

impl SearchConditionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the paging and sort defaults of the config file.
    pub fn from_config(defaults: &SearchDefaults) -> Self {
        Self {
            offset: defaults.default_offset,
            limit: defaults.default_limit,
            sort: defaults.default_sort.clone(),
            query_params: QueryParams::new(),
        }
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Raw sort string, e.g. `"age:desc,name"`. Parsed on `build()`.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    /// Add an equality filter. `None` is ignored. Re-putting an existing name
    /// replaces its value but keeps its original position, which is the
    /// position of its predicate in the `WHERE` clause.
    pub fn put_param<V: Into<ParamValue>>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.query_params.insert(name.into(), value.into());
        }
        self
    }

    /// Add a `NAME=VALUE` filter, typing the value with
    /// [`ParamValue::parse_literal`].
    pub fn put_assignment(self, raw: &str) -> Result<Self, ParamError> {
        let (name, value) = split_assignment(raw)?;
        Ok(self.put_param(name, Some(ParamValue::parse_literal(value))))
    }

    /// Add a `NAME=YYYYMMDD` (or `NAME=YYYY-MM-DD`) date filter.
    pub fn put_date_assignment(self, raw: &str) -> Result<Self, ParamError> {
        let (name, value) = split_assignment(raw)?;
        let date = ParamValue::parse_date(value)?;
        Ok(self.put_param(name, Some(date)))
    }

    pub fn build(self) -> SearchCondition {
        let condition = SearchCondition {
            filter: FilterWindow::new(self.offset, self.limit),
            sort_list: parse_sort(&self.sort),
            query_params: self.query_params,
        };
        debug!(
            params = ?condition.param_names(),
            sorts = condition.sort_list.len(),
            offset = condition.filter.offset(),
            limit = condition.filter.limit(),
            "Built search condition"
        );
        condition
    }
}
