use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::time::Instant;
use tracing::debug;

use crate::condition::{FilterWindow, QueryParams, SearchCondition};
use crate::query::{build_query, BuiltQuery};

/// One result row: column name → value, in projection order.
pub type Row = IndexMap<String, JsonValue>;

/// Trait that query backends implement. Queries arrive in the builder's
/// skeleton dialect with named placeholders; binding the values and applying
/// the window are the backend's job.
pub trait QueryExecutor {
    /// Run a count query and return the number of matching entities.
    fn count(&self, query: &str, params: &QueryParams) -> Result<u64>;

    /// Run a search query and return the rows inside `window`.
    fn fetch_page(&self, query: &str, params: &QueryParams, window: FilterWindow) -> Result<Vec<Row>>;
}

/// Total match count plus one window of rows.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub entity: String,
    pub total: u64,
    pub offset: usize,
    pub limit: usize,
    pub rows: Vec<Row>,
}

impl Page {
    /// Whether rows exist past this window.
    pub fn has_more(&self) -> bool {
        (self.offset as u64).saturating_add(self.rows.len() as u64) < self.total
    }
}

/// Build both queries for `entity` and run them. The page query is skipped
/// when nothing matches.
pub fn search(executor: &dyn QueryExecutor, entity: &str, condition: &SearchCondition) -> Result<Page> {
    let start = Instant::now();
    let BuiltQuery {
        count_query,
        search_query,
    } = build_query(entity, condition);

    let total = executor.count(&count_query, &condition.query_params)?;
    let rows = if total == 0 {
        Vec::new()
    } else {
        executor.fetch_page(&search_query, &condition.query_params, condition.filter)?
    };

    debug!(
        entity,
        params = ?condition.param_names(),
        total,
        rows = rows.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Search completed"
    );

    Ok(Page {
        entity: entity.to_string(),
        total,
        offset: condition.filter.offset(),
        limit: condition.filter.limit(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::SearchConditionBuilder;
    use std::cell::RefCell;

    /// Records every call and serves a fixed count and row set.
    struct RecordingExecutor {
        total: u64,
        calls: RefCell<Vec<String>>,
    }

    impl QueryExecutor for RecordingExecutor {
        fn count(&self, query: &str, params: &QueryParams) -> Result<u64> {
            let names: Vec<&str> = params.keys().map(String::as_str).collect();
            self.calls
                .borrow_mut()
                .push(format!("count[{}] {query}", names.join(",")));
            Ok(self.total)
        }

        fn fetch_page(&self, query: &str, _params: &QueryParams, window: FilterWindow) -> Result<Vec<Row>> {
            self.calls
                .borrow_mut()
                .push(format!("page[{}+{}] {query}", window.offset(), window.limit()));
            let mut row = Row::new();
            row.insert("id".to_string(), JsonValue::from(1));
            Ok(vec![row])
        }
    }

    #[test]
    fn test_search_runs_count_then_page() {
        let executor = RecordingExecutor {
            total: 3,
            calls: RefCell::new(Vec::new()),
        };
        let cond = SearchConditionBuilder::new()
            .put_param("status", Some("ACTIVE"))
            .sort("id")
            .offset(2)
            .limit(1)
            .build();

        let page = search(&executor, "User", &cond).unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.rows.len(), 1);
        assert!(!page.has_more());
        let calls = executor.calls.borrow();
        assert_eq!(
            *calls,
            vec![
                "count[status] SELECT COUNT(e) FROM User e WHERE e.status = :status ".to_string(),
                "page[2+1] SELECT e FROM User e WHERE e.status = :status ORDER BY e.id".to_string(),
            ]
        );
    }

    #[test]
    fn test_search_skips_page_when_empty() {
        let executor = RecordingExecutor {
            total: 0,
            calls: RefCell::new(Vec::new()),
        };
        let page = search(&executor, "User", &SearchCondition::default()).unwrap();
        assert_eq!(page.total, 0);
        assert!(page.rows.is_empty());
        assert_eq!(executor.calls.borrow().len(), 1);
    }

    #[test]
    fn test_has_more() {
        let page = Page {
            entity: "User".to_string(),
            total: 10,
            offset: 0,
            limit: 5,
            rows: vec![Row::new(); 5],
        };
        assert!(page.has_more());
    }
}
