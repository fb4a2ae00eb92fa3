use photo_search::search::{render, Column, ColumnMap, SqlValue};
use photo_search::{
    compile_filter, Database, Dialect, FilterQuery, Pagination, Scope, SearchError, SearchResults,
};
use std::time::Duration;

const DEADLINE: Duration = Duration::from_secs(5);

async fn demo_db() -> Database {
    let db = Database::in_memory().await.unwrap();
    db.insert_fixtures().await.unwrap();
    db
}

#[tokio::test]
async fn test_search_through_public_api() {
    let db = demo_db().await;

    let query = FilterQuery::new("path:\"1990/04\" public:true")
        .with_merged(true)
        .with_page(0, 10);
    let results = db.search_photos(&query, DEADLINE).await.unwrap();

    let page = match results {
        SearchResults::Merged(page) => page,
        other => panic!("expected merged results, got {:?}", other),
    };
    assert_eq!(page.total, 4);
    assert!(page.rows.iter().all(|row| row.path == "1990/04"));
}

#[tokio::test]
async fn test_precompiled_predicate_executes() {
    let db = demo_db().await;
    let predicate = compile_filter("country:at", db.dialect()).unwrap();

    let query = FilterQuery::new("country:at").with_scope(Scope::All);
    match db.execute(&query, &predicate, DEADLINE).await.unwrap() {
        SearchResults::Separate { direct, album } => {
            assert_eq!(direct.uids(), vec!["pt16", "pt15", "pt01"]);
            assert!(album.is_empty());
        }
        other => panic!("expected separate results, got {:?}", other),
    }
}

#[tokio::test]
async fn test_album_with_saved_filter() {
    let db = demo_db().await;

    let page = db
        .album_photos("as02", Pagination::new(0, 1), DEADLINE)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.uids(), vec!["pt15"]);
}

#[tokio::test]
async fn test_errors_display() {
    let db = demo_db().await;

    let err = db
        .search_photos(&FilterQuery::new("camera:leica"), DEADLINE)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::UnknownField(_)));
    assert_eq!(err.to_string(), "Unknown filter field: camera");
}

struct Columns;

impl ColumnMap for Columns {
    fn column(&self, column: Column) -> &'static str {
        match column {
            Column::Title => "caption",
            _ => "unused",
        }
    }
}

#[test]
fn test_render_with_custom_columns() {
    for dialect in Dialect::ALL {
        let predicate = compile_filter("sale%", dialect).unwrap();
        let fragment = render(&predicate, dialect, &Columns);
        assert!(fragment.sql.starts_with("caption "), "{}", fragment.sql);
        assert_eq!(fragment.binds, vec![SqlValue::String("%sale\\%%".to_string())]);
    }
}
