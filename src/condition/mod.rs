pub mod builder;
pub mod sort;
pub mod value;

use indexmap::IndexMap;
use serde::Serialize;

pub use builder::SearchConditionBuilder;
pub use value::{ParamError, ParamValue};

/// Default number of rows in one page.
pub const DEFAULT_LIMIT: usize = 100;

/// Named filter parameters. Insertion order is the `WHERE` predicate order.
pub type QueryParams = IndexMap<String, ParamValue>;

/// One ordering instruction: a property of the entity and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortDirective {
    pub field: String,
    pub ascending: bool,
}

impl SortDirective {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }
}

/// Offset/limit pair describing one page of results. Applied by the executor,
/// never written into the query text. Fields are private so the limit can
/// only be set through `new`, which keeps it above zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterWindow {
    offset: usize,
    limit: usize,
}

impl FilterWindow {
    /// A zero limit is raised to 1 so a window always covers at least one row.
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: limit.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for FilterWindow {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Paging window, sort directives and named equality filters for one search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchCondition {
    pub filter: FilterWindow,
    pub sort_list: Vec<SortDirective>,
    pub query_params: QueryParams,
}

impl SearchCondition {
    pub fn builder() -> SearchConditionBuilder {
        SearchConditionBuilder::new()
    }

    /// Parameter names in binding order.
    pub fn param_names(&self) -> Vec<&str> {
        self.query_params.keys().map(String::as_str).collect()
    }
}
