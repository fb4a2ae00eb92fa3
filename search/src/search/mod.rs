mod classifier;
mod compiler;
mod dialect;
mod gps;
mod tokenizer;
mod types;

pub use classifier::classify;
pub use compiler::{compile, compile_filter};
pub use dialect::{
    render, render_into, render_with_offset, ColumnMap, Dialect, Fragment, Placeholder, SqlWriter,
};
pub use gps::gps_bounds;
pub use tokenizer::tokenize;
pub use types::{
    Clause, Column, Comparator, Condition, Field, FieldClause, FieldKind, FieldValue, GpsBounds,
    Predicate, SqlValue, TermClause, Token, TokenKind,
};

#[cfg(test)]
mod tests;
