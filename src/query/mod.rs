//! Count/search query construction.
//!
//! Both queries use the fixed entity alias `e` and named placeholders
//! `:<param>`. Parameter values are never written into the text; the executor
//! binds them by name. Entity and field names are used verbatim.

use serde::Serialize;
use tracing::debug;

use crate::condition::{QueryParams, SearchCondition, SortDirective};

/// Alias qualifying every field reference in generated queries.
pub const ENTITY_ALIAS: &str = "e";

/// The pair of queries derived from one search condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltQuery {
    pub count_query: String,
    pub search_query: String,
}

/// Derive the count query and the search query for `entity_name`.
pub fn build_query(entity_name: &str, condition: &SearchCondition) -> BuiltQuery {
    let where_clause = build_where(&condition.query_params);
    let order_by = build_order_by(&condition.sort_list);

    let mut count_query = format!("SELECT COUNT({ENTITY_ALIAS}) FROM {entity_name} {ENTITY_ALIAS} ");
    let mut search_query = format!("SELECT {ENTITY_ALIAS} FROM {entity_name} {ENTITY_ALIAS} ");

    if !where_clause.is_empty() {
        count_query.push_str("WHERE ");
        count_query.push_str(&where_clause);
        search_query.push_str("WHERE ");
        search_query.push_str(&where_clause);
    }

    if !order_by.is_empty() {
        search_query.push_str("ORDER BY ");
        search_query.push_str(&order_by);
    }

    debug!(entity = entity_name, %count_query, %search_query, "Built queries");

    BuiltQuery {
        count_query,
        search_query,
    }
}

/// `e.a = :a AND e.b = :b ` (each predicate keeps a trailing space), or empty.
fn build_where(params: &QueryParams) -> String {
    params
        .keys()
        .map(|key| format!("{ENTITY_ALIAS}.{key} = :{key} "))
        .collect::<Vec<_>>()
        .join("AND ")
}

/// `e.a DESC, e.b`, or empty. Ascending is the store's implicit default.
fn build_order_by(sort_list: &[SortDirective]) -> String {
    sort_list
        .iter()
        .map(|sort| {
            let suffix = if sort.ascending { "" } else { " DESC" };
            format!("{ENTITY_ALIAS}.{}{suffix}", sort.field)
        })
        .collect::<Vec<_>>()
        .join(", ")
}
