use super::types::{
    Database, EntityKind, FilterQuery, Pagination, PhotoSummary, ResultPage, Scope, SearchResults,
};
use crate::error::SearchError;
use crate::search::{compile_filter, render_into, Predicate, SqlValue, SqlWriter};
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::SqliteConnection;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Newest first, id breaks ties so pages stay stable.
const ORDER_BY: &str = "ORDER BY p.taken_at DESC, p.id DESC";

const SUMMARY_COLUMNS: &str =
    "id, photo_uid AS uid, photo_title AS title, photo_path AS path, photo_name AS name, taken_at";

type RowQuery<'q, O> = sqlx::query::QueryAs<'q, Sqlite, O, SqliteArguments<'q>>;

/// A statement and its bind values, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Statement {
    pub sql: String,
    pub binds: Vec<SqlValue>,
}

fn bind_values<'q, O>(mut query: RowQuery<'q, O>, binds: &[SqlValue]) -> RowQuery<'q, O> {
    for value in binds {
        query = match value {
            SqlValue::String(s) => query.bind(s.clone()),
            SqlValue::Integer(i) => query.bind(*i),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Bool(b) => query.bind(*b),
        };
    }
    query
}

/// `WHERE` body for one entity kind: visibility (unless unrestricted) AND
/// the compiled predicate.
fn kind_condition(
    kind: EntityKind,
    predicate: &Predicate,
    scope: Scope,
    writer: &mut SqlWriter,
) -> String {
    let filter = render_into(predicate, &kind, writer);
    match scope {
        Scope::Public => format!("{} AND ({})", kind.visibility_sql(), filter),
        Scope::All => format!("({})", filter),
    }
}

fn kind_ids(
    kind: EntityKind,
    predicate: &Predicate,
    scope: Scope,
    writer: &mut SqlWriter,
) -> String {
    format!(
        "SELECT p.id FROM {} WHERE {}",
        kind.tables_sql(),
        kind_condition(kind, predicate, scope, writer)
    )
}

fn merged_ids(predicate: &Predicate, scope: Scope, writer: &mut SqlWriter) -> String {
    let direct = kind_ids(EntityKind::Direct, predicate, scope, writer);
    let album = kind_ids(EntityKind::Album, predicate, scope, writer);
    format!("{} UNION {}", direct, album)
}

pub(crate) fn merged_page_statement(
    db: &Database,
    predicate: &Predicate,
    scope: Scope,
    page: Pagination,
) -> Statement {
    let mut writer = SqlWriter::new(db.dialect);
    let ids = merged_ids(predicate, scope, &mut writer);
    let limit = writer.bind(SqlValue::Integer(page.limit));
    let offset = writer.bind(SqlValue::Integer(page.offset));
    Statement {
        sql: format!(
            "SELECT p.id, p.taken_at FROM photos p WHERE p.id IN ({}) {} LIMIT {} OFFSET {}",
            ids, ORDER_BY, limit, offset
        ),
        binds: writer.into_binds(),
    }
}

pub(crate) fn merged_count_statement(
    db: &Database,
    predicate: &Predicate,
    scope: Scope,
) -> Statement {
    let mut writer = SqlWriter::new(db.dialect);
    let ids = merged_ids(predicate, scope, &mut writer);
    Statement {
        sql: format!("SELECT COUNT(*) FROM ({}) AS matches", ids),
        binds: writer.into_binds(),
    }
}

pub(crate) fn kind_page_statement(
    db: &Database,
    kind: EntityKind,
    predicate: &Predicate,
    scope: Scope,
    page: Pagination,
) -> Statement {
    let mut writer = SqlWriter::new(db.dialect);
    let condition = kind_condition(kind, predicate, scope, &mut writer);
    let limit = writer.bind(SqlValue::Integer(page.limit));
    let offset = writer.bind(SqlValue::Integer(page.offset));
    Statement {
        sql: format!(
            "SELECT DISTINCT p.id, p.taken_at FROM {} WHERE {} {} LIMIT {} OFFSET {}",
            kind.tables_sql(),
            condition,
            ORDER_BY,
            limit,
            offset
        ),
        binds: writer.into_binds(),
    }
}

pub(crate) fn kind_count_statement(
    db: &Database,
    kind: EntityKind,
    predicate: &Predicate,
    scope: Scope,
) -> Statement {
    let mut writer = SqlWriter::new(db.dialect);
    let condition = kind_condition(kind, predicate, scope, &mut writer);
    Statement {
        sql: format!(
            "SELECT COUNT(DISTINCT p.id) FROM {} WHERE {}",
            kind.tables_sql(),
            condition
        ),
        binds: writer.into_binds(),
    }
}

async fn fetch_ids(conn: &mut SqliteConnection, stmt: &Statement) -> Result<Vec<i64>, SearchError> {
    let rows: Vec<(i64, String)> = bind_values(sqlx::query_as(&stmt.sql), &stmt.binds)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows.into_iter().map(|(id, _)| id).collect())
}

async fn fetch_count(conn: &mut SqliteConnection, stmt: &Statement) -> Result<i64, SearchError> {
    let count: (i64,) = bind_values(sqlx::query_as(&stmt.sql), &stmt.binds)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count.0)
}

impl Database {
    /// Compiles the query's filter for the active dialect and executes it.
    pub async fn search_photos(
        &self,
        query: &FilterQuery,
        deadline: Duration,
    ) -> Result<SearchResults, SearchError> {
        let predicate = compile_filter(query.filter(), self.dialect)?;
        self.execute(query, &predicate, deadline).await
    }

    /// Executes a compiled predicate with visibility, merge mode and
    /// pagination applied. Fails with `QueryTimeout` once `deadline` passes.
    pub async fn execute(
        &self,
        query: &FilterQuery,
        predicate: &Predicate,
        deadline: Duration,
    ) -> Result<SearchResults, SearchError> {
        let page = query.pagination();
        page.validate()?;

        let results = self
            .with_deadline(deadline, self.run_query(query, predicate))
            .await?;

        let (total, returned) = match &results {
            SearchResults::Merged(page) => (page.total, page.len()),
            SearchResults::Separate { direct, album } => {
                (direct.total + album.total, direct.len() + album.len())
            }
        };
        info!(
            filter = %query.filter(),
            merged = query.merged(),
            total = total,
            returned = returned,
            "Photo search completed"
        );
        Ok(results)
    }

    /// Photos of one album. Albums with a saved filter (moments, months,
    /// states, folders) are resolved by running that filter; other albums
    /// return their members. `None` when the album does not exist.
    pub async fn album_photos(
        &self,
        album_uid: &str,
        page: Pagination,
        deadline: Duration,
    ) -> Result<Option<ResultPage>, SearchError> {
        page.validate()?;
        self.with_deadline(deadline, self.run_album(album_uid, page))
            .await
    }

    async fn run_query(
        &self,
        query: &FilterQuery,
        predicate: &Predicate,
    ) -> Result<SearchResults, SearchError> {
        let page = query.pagination();
        let mut conn = self.pool.acquire().await?;

        if query.merged() {
            let merged = self
                .merged_page(&mut conn, predicate, query.scope(), page)
                .await?;
            return Ok(SearchResults::Merged(merged));
        }

        let direct = self
            .kind_page(&mut conn, EntityKind::Direct, predicate, query.scope(), page)
            .await?;
        let album = self
            .kind_page(&mut conn, EntityKind::Album, predicate, query.scope(), page)
            .await?;
        Ok(SearchResults::Separate { direct, album })
    }

    async fn run_album(
        &self,
        album_uid: &str,
        page: Pagination,
    ) -> Result<Option<ResultPage>, SearchError> {
        let mut conn = self.pool.acquire().await?;
        let album: Option<(i64, String)> = sqlx::query_as(
            "SELECT id, album_filter FROM albums WHERE album_uid = ? AND deleted_at IS NULL",
        )
        .bind(album_uid)
        .fetch_optional(&mut *conn)
        .await?;

        let Some((album_id, saved_filter)) = album else {
            return Ok(None);
        };

        if saved_filter.trim().is_empty() {
            debug!(album_uid = %album_uid, "Listing album members");
            let members = self.member_page(&mut conn, album_id, page).await?;
            return Ok(Some(members));
        }

        debug!(album_uid = %album_uid, filter = %saved_filter, "Running saved album filter");
        let predicate = compile_filter(&saved_filter, self.dialect)?;
        let matches = self
            .kind_page(&mut conn, EntityKind::Direct, &predicate, Scope::Public, page)
            .await?;
        Ok(Some(matches))
    }

    /// Runs `fut` with a deadline. The pool connection it holds is dropped,
    /// and so released, on every exit path.
    async fn with_deadline<T, F>(&self, deadline: Duration, fut: F) -> Result<T, SearchError>
    where
        F: Future<Output = Result<T, SearchError>>,
    {
        match tokio::time::timeout(deadline, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    deadline_ms = deadline.as_millis() as u64,
                    "Photo query timed out"
                );
                Err(SearchError::QueryTimeout(deadline))
            }
        }
    }

    async fn merged_page(
        &self,
        conn: &mut SqliteConnection,
        predicate: &Predicate,
        scope: Scope,
        page: Pagination,
    ) -> Result<ResultPage, SearchError> {
        let ids = fetch_ids(conn, &merged_page_statement(self, predicate, scope, page)).await?;
        let total = fetch_count(conn, &merged_count_statement(self, predicate, scope)).await?;
        self.assemble_page(conn, ids, total, page).await
    }

    async fn kind_page(
        &self,
        conn: &mut SqliteConnection,
        kind: EntityKind,
        predicate: &Predicate,
        scope: Scope,
        page: Pagination,
    ) -> Result<ResultPage, SearchError> {
        let ids = fetch_ids(conn, &kind_page_statement(self, kind, predicate, scope, page)).await?;
        let total = fetch_count(conn, &kind_count_statement(self, kind, predicate, scope)).await?;
        self.assemble_page(conn, ids, total, page).await
    }

    async fn member_page(
        &self,
        conn: &mut SqliteConnection,
        album_id: i64,
        page: Pagination,
    ) -> Result<ResultPage, SearchError> {
        let tables = EntityKind::Album.tables_sql();
        let visibility = EntityKind::Album.visibility_sql();

        let mut writer = SqlWriter::new(self.dialect);
        let album = writer.bind(SqlValue::Integer(album_id));
        let limit = writer.bind(SqlValue::Integer(page.limit));
        let offset = writer.bind(SqlValue::Integer(page.offset));
        let ids = Statement {
            sql: format!(
                "SELECT DISTINCT p.id, p.taken_at FROM {} WHERE {} AND a.id = {} {} LIMIT {} OFFSET {}",
                tables, visibility, album, ORDER_BY, limit, offset
            ),
            binds: writer.into_binds(),
        };

        let mut writer = SqlWriter::new(self.dialect);
        let album = writer.bind(SqlValue::Integer(album_id));
        let count = Statement {
            sql: format!(
                "SELECT COUNT(DISTINCT p.id) FROM {} WHERE {} AND a.id = {}",
                tables, visibility, album
            ),
            binds: writer.into_binds(),
        };

        let ids = fetch_ids(conn, &ids).await?;
        let total = fetch_count(conn, &count).await?;
        self.assemble_page(conn, ids, total, page).await
    }

    async fn assemble_page(
        &self,
        conn: &mut SqliteConnection,
        ids: Vec<i64>,
        total: i64,
        page: Pagination,
    ) -> Result<ResultPage, SearchError> {
        let rows = self.load_summaries(conn, &ids).await?;
        Ok(ResultPage {
            rows,
            total,
            offset: page.offset,
            limit: page.limit,
        })
    }

    /// Loads summaries for `ids` in dialect sized batches, keeping the order
    /// of `ids`.
    async fn load_summaries(
        &self,
        conn: &mut SqliteConnection,
        ids: &[i64],
    ) -> Result<Vec<PhotoSummary>, SearchError> {
        let mut by_id: HashMap<i64, PhotoSummary> = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(self.batch_size().max(1)) {
            let mut writer = SqlWriter::new(self.dialect);
            let placeholders = chunk
                .iter()
                .map(|id| writer.bind(SqlValue::Integer(*id)))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "SELECT {} FROM photos WHERE id IN ({})",
                SUMMARY_COLUMNS, placeholders
            );
            let binds = writer.into_binds();
            let rows: Vec<PhotoSummary> = bind_values(sqlx::query_as(&sql), &binds)
                .fetch_all(&mut *conn)
                .await?;
            by_id.extend(rows.into_iter().map(|row| (row.id, row)));
        }

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}
