use super::classifier::classify;
use super::dialect::Dialect;
use super::tokenizer::tokenize;
use super::types::{
    Clause, Column, Comparator, Condition, Field, FieldClause, FieldKind, FieldValue, Predicate,
    SqlValue, TermClause,
};
use crate::error::SearchError;

/// Compiles classified clauses into a conjunction of conditions for
/// `dialect`. Pure: the same clauses and dialect always give the same
/// predicate.
pub fn compile(clauses: &[Clause], dialect: Dialect) -> Predicate {
    let mut conditions = Vec::new();

    for clause in clauses {
        match clause {
            Clause::Field(field) => compile_field(field, dialect, &mut conditions),
            Clause::Term(term) => conditions.push(compile_term(term, dialect)),
        }
    }

    Predicate {
        conditions,
        escape: dialect.escape,
    }
}

/// Tokenizes, classifies and compiles a raw filter string.
pub fn compile_filter(raw: &str, dialect: Dialect) -> Result<Predicate, SearchError> {
    let tokens = tokenize(raw)?;
    let clauses = classify(&tokens)?;
    let predicate = compile(&clauses, dialect);
    tracing::debug!(
        filter = %raw,
        dialect = dialect.name,
        conditions = predicate.conditions.len(),
        "Compiled filter"
    );
    Ok(predicate)
}

fn compile_term(term: &TermClause, dialect: Dialect) -> Condition {
    if term.exact {
        Condition {
            column: Column::Title,
            comparator: Comparator::Equals,
            value: SqlValue::String(term.text.clone()),
        }
    } else {
        Condition {
            column: Column::Title,
            comparator: Comparator::Contains,
            value: SqlValue::String(dialect.escape_pattern(&term.text)),
        }
    }
}

fn compile_field(clause: &FieldClause, dialect: Dialect, out: &mut Vec<Condition>) {
    let field = clause.field;
    match &clause.value {
        FieldValue::Bounds(bounds) => {
            let range = [
                (Column::Latitude, Comparator::AtLeast, bounds.south),
                (Column::Latitude, Comparator::AtMost, bounds.north),
                (Column::Longitude, Comparator::AtLeast, bounds.west),
                (Column::Longitude, Comparator::AtMost, bounds.east),
            ];
            out.extend(range.into_iter().map(|(column, comparator, deg)| Condition {
                column,
                comparator,
                value: SqlValue::Float(deg),
            }));
        }
        FieldValue::Text(text) => out.push(match field.kind() {
            FieldKind::Prefix => Condition {
                column: field_column(field),
                comparator: Comparator::StartsWith,
                value: SqlValue::String(dialect.escape_pattern(text)),
            },
            FieldKind::Suffix => Condition {
                column: field_column(field),
                comparator: Comparator::EndsWith,
                value: SqlValue::String(
                    dialect.escape_pattern(&format!(".{}", text.trim_start_matches('.'))),
                ),
            },
            _ => Condition {
                column: field_column(field),
                comparator: Comparator::Equals,
                value: SqlValue::String(text.clone()),
            },
        }),
        FieldValue::Bool(flag) => out.push(Condition {
            column: field_column(field),
            comparator: Comparator::Equals,
            // public:true means "not private"
            value: SqlValue::Bool(if field == Field::Public { !flag } else { *flag }),
        }),
        FieldValue::Int(n) => out.push(Condition {
            column: field_column(field),
            comparator: Comparator::Equals,
            value: SqlValue::Integer(*n),
        }),
    }
}

fn field_column(field: Field) -> Column {
    match field {
        Field::Path | Field::Folder => Column::Path,
        Field::Name | Field::Ext => Column::Name,
        Field::Title => Column::Title,
        Field::Public | Field::Private => Column::Private,
        Field::Favorite => Column::Favorite,
        Field::Country => Column::Country,
        Field::State => Column::State,
        Field::Year => Column::Year,
        Field::Month => Column::Month,
        Field::Day => Column::Day,
        Field::Category => Column::Category,
        Field::LatLng => Column::Latitude,
    }
}
