use super::gps::gps_bounds;
use super::types::{Clause, Field, FieldClause, FieldKind, FieldValue, TermClause, Token, TokenKind};
use crate::error::SearchError;

/// Maps tokens to field clauses or free-text terms, keeping input order.
pub fn classify(tokens: &[Token]) -> Result<Vec<Clause>, SearchError> {
    tokens.iter().map(classify_token).collect()
}

fn classify_token(token: &Token) -> Result<Clause, SearchError> {
    match &token.kind {
        TokenKind::KeyValue { key, value } => match Field::from_key(key) {
            Some(field) => Ok(Clause::Field(FieldClause {
                field,
                value: parse_value(field, value)?,
                quoted: token.quoted,
            })),
            None if is_identifier(key) => Err(SearchError::UnknownField(key.clone())),
            // Colons in things like "12:30" are search text.
            None => Ok(free_text(token)),
        },
        TokenKind::FreeText => Ok(free_text(token)),
    }
}

fn free_text(token: &Token) -> Clause {
    Clause::Term(TermClause {
        text: token.raw.clone(),
        exact: token.quoted,
    })
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn parse_value(field: Field, value: &str) -> Result<FieldValue, SearchError> {
    let key = field.key();
    match field.kind() {
        FieldKind::Text | FieldKind::Prefix | FieldKind::Suffix => {
            Ok(FieldValue::Text(value.to_string()))
        }
        FieldKind::Bool => {
            if value.eq_ignore_ascii_case("true") {
                Ok(FieldValue::Bool(true))
            } else if value.eq_ignore_ascii_case("false") {
                Ok(FieldValue::Bool(false))
            } else {
                Err(SearchError::invalid_value(
                    key,
                    value,
                    "expected true or false",
                ))
            }
        }
        FieldKind::Int { min, max } => {
            let n = value
                .parse::<i64>()
                .map_err(|_| SearchError::invalid_value(key, value, "expected an integer"))?;
            if n < min || n > max {
                return Err(SearchError::invalid_value(
                    key,
                    value,
                    format!("must be between {} and {}", min, max),
                ));
            }
            Ok(FieldValue::Int(n))
        }
        FieldKind::CountryCode => {
            if value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic()) {
                Ok(FieldValue::Text(value.to_ascii_lowercase()))
            } else {
                Err(SearchError::invalid_value(
                    key,
                    value,
                    "expected a two-letter country code",
                ))
            }
        }
        FieldKind::Bounds => gps_bounds(value)
            .map(FieldValue::Bounds)
            .map_err(|reason| SearchError::invalid_value(key, value, reason)),
    }
}
