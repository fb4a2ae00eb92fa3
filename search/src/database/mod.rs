/// Default database URL for local development
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./photos.db?mode=rwc";

pub mod core;
pub mod fixtures;
pub mod photos;
pub mod types;

pub use self::core::RetryPolicy;
pub use types::{
    Database, EntityKind, FilterQuery, Pagination, PhotoSummary, ResultPage, Scope, SearchResults,
};
