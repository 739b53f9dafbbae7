//! Adapts the builder's query skeleton to SQLite.
//!
//! Only the projection differs: SQLite cannot select or count a bare table
//! alias. Predicates, named placeholders and `ORDER BY` are already valid.

use crate::condition::FilterWindow;
use crate::query::ENTITY_ALIAS;

/// Rewrite the leading projection of a built query into SQLite syntax.
/// Queries that do not start with a known projection pass through untouched.
pub fn to_sqlite(query: &str) -> String {
    let count_prefix = format!("SELECT COUNT({ENTITY_ALIAS}) FROM ");
    let select_prefix = format!("SELECT {ENTITY_ALIAS} FROM ");

    if let Some(rest) = query.strip_prefix(&count_prefix) {
        format!("SELECT COUNT(*) FROM {rest}")
    } else if let Some(rest) = query.strip_prefix(&select_prefix) {
        format!("SELECT {ENTITY_ALIAS}.* FROM {rest}")
    } else {
        query.to_string()
    }
}

/// Append the paging window to a (rewritten) search query. SQLite integers
/// are signed 64-bit, so both bounds are capped at `i64::MAX`.
pub fn with_window(query: &str, window: FilterWindow) -> String {
    format!(
        "{} LIMIT {} OFFSET {}",
        query.trim_end(),
        sqlite_int(window.limit()),
        sqlite_int(window.offset())
    )
}

fn sqlite_int(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
