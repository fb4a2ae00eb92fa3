use crate::error::SearchError;
use crate::search::{Column, ColumnMap, Dialect};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Clone, Debug)]
pub struct Database {
    pub(crate) pool: SqlitePool,
    pub(crate) dialect: Dialect,
}

/// Who is asking. Decides whether private and archived rows are visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Public,
    /// Sees everything, including private and archived photos.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 100,
        }
    }
}

impl Pagination {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.limit <= 0 || self.offset < 0 {
            return Err(SearchError::InvalidPagination {
                offset: self.offset,
                limit: self.limit,
            });
        }
        Ok(())
    }
}

/// Caller supplied search request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    filter: String,
    merged: bool,
    pagination: Pagination,
    scope: Scope,
}

impl FilterQuery {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            merged: false,
            pagination: Pagination::default(),
            scope: Scope::default(),
        }
    }

    pub fn with_merged(mut self, merged: bool) -> Self {
        self.merged = merged;
        self
    }

    pub fn with_page(mut self, offset: i64, limit: i64) -> Self {
        self.pagination = Pagination::new(offset, limit);
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn merged(&self) -> bool {
        self.merged
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }
}

/// The two ways a photo can match a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// The filter is evaluated on the photo row itself.
    Direct,
    /// The filter is evaluated through album membership: path and title
    /// resolve against the album, everything else against the photo.
    Album,
}

impl EntityKind {
    pub(crate) fn tables_sql(self) -> &'static str {
        match self {
            EntityKind::Direct => "photos p",
            EntityKind::Album => {
                "photos p JOIN photos_albums pa ON pa.photo_id = p.id JOIN albums a ON a.id = pa.album_id"
            }
        }
    }

    pub(crate) fn visibility_sql(self) -> &'static str {
        match self {
            EntityKind::Direct => "p.photo_private = 0 AND p.deleted_at IS NULL",
            EntityKind::Album => {
                "p.photo_private = 0 AND p.deleted_at IS NULL AND pa.hidden = 0 AND a.album_private = 0 AND a.deleted_at IS NULL"
            }
        }
    }
}

impl ColumnMap for EntityKind {
    fn column(&self, column: Column) -> &'static str {
        match (self, column) {
            (EntityKind::Album, Column::Title) => "a.album_title",
            (EntityKind::Album, Column::Path) => "a.album_path",
            (_, Column::Title) => "p.photo_title",
            (_, Column::Path) => "p.photo_path",
            (_, Column::Name) => "p.photo_name",
            (_, Column::Private) => "p.photo_private",
            (_, Column::Favorite) => "p.photo_favorite",
            (_, Column::Country) => "p.photo_country",
            (_, Column::State) => "p.place_state",
            (_, Column::Year) => "p.photo_year",
            (_, Column::Month) => "p.photo_month",
            (_, Column::Day) => "p.photo_day",
            (_, Column::Category) => "p.photo_category",
            (_, Column::Latitude) => "p.photo_lat",
            (_, Column::Longitude) => "p.photo_lng",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PhotoSummary {
    pub id: i64,
    pub uid: String,
    pub title: String,
    pub path: String,
    pub name: String,
    pub taken_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub rows: Vec<PhotoSummary>,
    /// Number of matching photos before pagination.
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

impl ResultPage {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn uids(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.uid.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SearchResults {
    Merged(ResultPage),
    Separate { direct: ResultPage, album: ResultPage },
}
