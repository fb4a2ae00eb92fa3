//! Filter query compiler and photo search for a photo collection.
//!
//! A filter string such as `country:at year:2016 "Golden Hour"` is tokenized,
//! classified into field and free-text clauses, compiled into an
//! engine-neutral [`Predicate`] and rendered for a [`Dialect`]. The database
//! layer executes it against photos directly and through album membership.

pub mod config;
pub mod database;
pub mod error;
pub mod search;

pub use config::SearchConfig;
pub use database::{
    Database, EntityKind, FilterQuery, Pagination, PhotoSummary, ResultPage, RetryPolicy, Scope,
    SearchResults,
};
pub use error::SearchError;
pub use search::{compile, compile_filter, Dialect, Predicate};
