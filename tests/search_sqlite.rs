use serde_json::Value as JsonValue;
use sqb::condition::{FilterWindow, SearchCondition, SearchConditionBuilder};
use sqb::db::Database;
use sqb::query::build_query;
use sqb::search::search;

fn users_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.conn
        .execute_batch(
            "CREATE TABLE User (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                age INTEGER NOT NULL,
                status TEXT NOT NULL,
                region TEXT NOT NULL,
                joined TEXT NOT NULL
            );
            INSERT INTO User VALUES (1, 'ana',   31, 'ACTIVE',   'EU', '2023-01-15');
            INSERT INTO User VALUES (2, 'ben',   45, 'ACTIVE',   'EU', '2023-02-01');
            INSERT INTO User VALUES (3, 'cleo',  45, 'ACTIVE',   'EU', '2024-05-20');
            INSERT INTO User VALUES (4, 'dan',   22, 'INACTIVE', 'EU', '2022-11-30');
            INSERT INTO User VALUES (5, 'eve',   38, 'ACTIVE',   'US', '2023-01-15');",
        )
        .unwrap();
    db
}

fn names(rows: &[sqb::search::Row]) -> Vec<String> {
    rows.iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn filters_sorts_and_counts_active_eu_users() {
    let db = users_db();
    let cond = SearchConditionBuilder::new()
        .put_param("status", Some("ACTIVE"))
        .put_param("region", Some("EU"))
        .sort("age:desc,name")
        .build();

    let page = search(&db, "User", &cond).unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(names(&page.rows), vec!["ben", "cleo", "ana"]);
    assert!(!page.has_more());
}

#[test]
fn window_is_applied_by_executor() {
    let db = users_db();
    let cond = SearchConditionBuilder::new()
        .sort("id")
        .offset(1)
        .limit(2)
        .build();

    let built = build_query("User", &cond);
    assert!(!built.search_query.contains("LIMIT"));

    let page = search(&db, "User", &cond).unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(names(&page.rows), vec!["ben", "cleo"]);
    assert!(page.has_more());
}

#[test]
fn no_filters_returns_everything() {
    let db = users_db();
    let page = search(&db, "User", &SearchCondition::default()).unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.rows.len(), 5);
    assert_eq!(page.limit, 100);
}

#[test]
fn typed_params_bind_by_name() {
    let db = users_db();
    let cond = SearchConditionBuilder::new()
        .put_assignment("age=45")
        .and_then(|b| b.put_date_assignment("joined=20230201"))
        .unwrap()
        .build();

    let page = search(&db, "User", &cond).unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.rows[0]["id"], JsonValue::from(2));
}

#[test]
fn value_text_is_not_interpreted_as_sql() {
    let db = users_db();
    let cond = SearchConditionBuilder::new()
        .put_param("name", Some("ana' OR '1'='1"))
        .build();

    let page = search(&db, "User", &cond).unwrap();
    assert_eq!(page.total, 0);
    assert!(page.rows.is_empty());
}

#[test]
fn unknown_field_surfaces_from_executor() {
    let db = users_db();
    let cond = SearchConditionBuilder::new()
        .put_param("nickname", Some("x"))
        .build();

    // The builder accepts it; only execution fails.
    let built = build_query("User", &cond);
    assert!(built.count_query.contains("e.nickname = :nickname"));
    assert!(search(&db, "User", &cond).is_err());
}

#[test]
fn page_serializes_rows_in_column_order() {
    let db = users_db();
    let cond = SearchConditionBuilder::new()
        .put_param("id", Some(4))
        .build();

    let page = search(&db, "User", &cond).unwrap();
    let json = serde_json::to_string(&page.rows[0]).unwrap();
    assert_eq!(
        json,
        r#"{"id":4,"name":"dan","age":22,"status":"INACTIVE","region":"EU","joined":"2022-11-30"}"#
    );
}

#[test]
fn limit_beyond_sqlite_integer_range_returns_all_rows() {
    let db = users_db();
    let cond = SearchConditionBuilder::new()
        .sort("id")
        .limit(usize::MAX)
        .build();

    let page = search(&db, "User", &cond).unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.rows.len(), 5);
}

#[test]
fn offset_beyond_sqlite_integer_range_returns_no_rows() {
    let db = users_db();
    let cond = SearchConditionBuilder::new().offset(usize::MAX).build();

    let page = search(&db, "User", &cond).unwrap();
    assert_eq!(page.total, 5);
    assert!(page.rows.is_empty());
}

#[test]
fn zero_limit_still_fetches_a_row() {
    let db = users_db();
    let cond = SearchCondition {
        filter: FilterWindow::new(0, 0),
        ..Default::default()
    };
    assert_eq!(cond.filter.limit(), 1);

    let page = search(&db, "User", &cond).unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.rows.len(), 1);
}
