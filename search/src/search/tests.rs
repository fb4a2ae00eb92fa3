use super::*;
use crate::error::SearchError;

const PATTERN_QUERIES: &[&str] = &[
    "%gold",
    "sale%",
    "I love % dog",
    "&IlikeFood",
    "Pets & Dogs",
    "Light&",
    "'Family",
    "Father's Day",
    "Ice Cream'",
    "*Forrest",
    "My*Kids",
    "Yoga***",
    "|Banana",
    "Red|Green",
    "Blue|",
    "345 Shirt",
    "Color555 Blue",
    "Route 66",
];

/// Unqualified column names, enough to check rendered SQL.
struct PlainColumns;

impl ColumnMap for PlainColumns {
    fn column(&self, column: Column) -> &'static str {
        match column {
            Column::Title => "title",
            Column::Path => "path",
            Column::Name => "name",
            Column::Private => "private",
            Column::Year => "year",
            Column::Latitude => "lat",
            Column::Longitude => "lng",
            _ => "other",
        }
    }
}

fn key_value(token: &Token) -> (&str, &str) {
    match &token.kind {
        TokenKind::KeyValue { key, value } => (key.as_str(), value.as_str()),
        TokenKind::FreeText => panic!("expected key:value token, got {:?}", token),
    }
}

// Tokenizer

#[test]
fn test_tokenize_field_clauses() {
    let tokens = tokenize("path:\"1990/04\" public:true").unwrap();
    assert_eq!(tokens.len(), 2);

    assert_eq!(key_value(&tokens[0]), ("path", "1990/04"));
    assert!(tokens[0].quoted);
    assert_eq!(tokens[0].raw, "path:1990/04");
    assert_eq!(tokens[0].offset, 0);

    assert_eq!(key_value(&tokens[1]), ("public", "true"));
    assert!(!tokens[1].quoted);
    assert_eq!(tokens[1].offset, 15);
}

#[test]
fn test_tokenize_quoted_phrase_is_one_token() {
    let tokens = tokenize("  \"Golden Hour\"   sunset ").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::FreeText);
    assert_eq!(tokens[0].raw, "Golden Hour");
    assert!(tokens[0].quoted);
    assert_eq!(tokens[0].offset, 2);
    assert_eq!(tokens[1].raw, "sunset");
    assert!(!tokens[1].quoted);
}

#[test]
fn test_tokenize_keeps_special_characters() {
    let tokens = tokenize("I love % dog *Forrest |Banana 'Family").unwrap();
    let raws: Vec<&str> = tokens.iter().map(|t| t.raw.as_str()).collect();
    assert_eq!(
        raws,
        vec!["I", "love", "%", "dog", "*Forrest", "|Banana", "'Family"]
    );
    assert!(tokens.iter().all(|t| t.kind == TokenKind::FreeText));
}

#[test]
fn test_tokenize_escaped_quotes() {
    let tokens = tokenize(r#"title:"Say \"cheese\" \\o/""#).unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(key_value(&tokens[0]), ("title", r#"Say "cheese" \o/"#));
    assert!(tokens[0].quoted);
}

#[test]
fn test_tokenize_empty_input() {
    assert!(tokenize("").unwrap().is_empty());
    assert!(tokenize("   \t ").unwrap().is_empty());
    assert!(tokenize("\"\"").unwrap().is_empty());
}

#[test]
fn test_tokenize_unterminated_quote() {
    match tokenize("country:at \"Golden") {
        Err(SearchError::ParseError { position, .. }) => assert_eq!(position, 11),
        other => panic!("expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_tokenize_error_position_counts_chars() {
    match tokenize("café \"x") {
        Err(SearchError::ParseError { position, .. }) => assert_eq!(position, 5),
        other => panic!("expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_tokenize_colon_without_value_is_free_text() {
    let tokens = tokenize("year: :30").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::FreeText);
    assert_eq!(tokens[0].raw, "year:");
    assert_eq!(tokens[1].kind, TokenKind::FreeText);
    assert_eq!(tokens[1].raw, ":30");
}

#[test]
fn test_tokenize_colon_inside_quotes_is_content() {
    let tokens = tokenize("\"a:b\"").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::FreeText);
    assert_eq!(tokens[0].raw, "a:b");
}

// Classifier

fn classify_str(raw: &str) -> Result<Vec<Clause>, SearchError> {
    classify(&tokenize(raw)?)
}

#[test]
fn test_classify_known_fields() {
    let clauses = classify_str("Country:AT year:2016 public:true path:\"2016/04\"").unwrap();
    assert_eq!(
        clauses,
        vec![
            Clause::Field(FieldClause {
                field: Field::Country,
                value: FieldValue::Text("at".to_string()),
                quoted: false,
            }),
            Clause::Field(FieldClause {
                field: Field::Year,
                value: FieldValue::Int(2016),
                quoted: false,
            }),
            Clause::Field(FieldClause {
                field: Field::Public,
                value: FieldValue::Bool(true),
                quoted: false,
            }),
            Clause::Field(FieldClause {
                field: Field::Path,
                value: FieldValue::Text("2016/04".to_string()),
                quoted: true,
            }),
        ]
    );
}

#[test]
fn test_classify_free_text_terms() {
    let clauses = classify_str("sunset \"Golden Hour\"").unwrap();
    assert_eq!(
        clauses,
        vec![
            Clause::Term(TermClause {
                text: "sunset".to_string(),
                exact: false,
            }),
            Clause::Term(TermClause {
                text: "Golden Hour".to_string(),
                exact: true,
            }),
        ]
    );
}

#[test]
fn test_classify_unknown_key_rejected() {
    match classify_str("bogus:value") {
        Err(SearchError::UnknownField(key)) => assert_eq!(key, "bogus"),
        other => panic!("expected UnknownField, got {:?}", other),
    }
}

#[test]
fn test_classify_timestamp_stays_free_text() {
    let clauses = classify_str("12:30").unwrap();
    assert_eq!(
        clauses,
        vec![Clause::Term(TermClause {
            text: "12:30".to_string(),
            exact: false,
        })]
    );
}

#[test]
fn test_classify_invalid_values() {
    for raw in [
        "public:yes",
        "favorite:1",
        "year:0",
        "year:twenty",
        "month:13",
        "day:32",
        "day:-1",
        "country:aut",
        "country:1a",
        "latlng:\"48,14,47\"",
    ] {
        match classify_str(raw) {
            Err(SearchError::InvalidClauseValue { field, .. }) => {
                assert_eq!(Some(field.as_str()), raw.split(':').next(), "{}", raw)
            }
            other => panic!("expected InvalidClauseValue for {}, got {:?}", raw, other),
        }
    }
}

#[test]
fn test_field_keys_round_trip() {
    for field in Field::ALL {
        assert_eq!(Field::from_key(field.key()), Some(field));
        assert_eq!(Field::from_key(&field.key().to_uppercase()), Some(field));
    }
    assert_eq!(Field::from_key("bogus"), None);
}

// Compiler

#[test]
fn test_compile_escapes_free_text() {
    let predicate = compile_filter("%gold", Dialect::SQLITE).unwrap();
    assert_eq!(
        predicate.conditions,
        vec![Condition {
            column: Column::Title,
            comparator: Comparator::Contains,
            value: SqlValue::String("\\%gold".to_string()),
        }]
    );
    assert_eq!(predicate.escape, '\\');
}

#[test]
fn test_compile_escapes_escape_character() {
    let predicate = compile_filter("a\\b_c", Dialect::SQLITE).unwrap();
    assert_eq!(
        predicate.conditions[0].value,
        SqlValue::String("a\\\\b\\_c".to_string())
    );
}

#[test]
fn test_compile_quoted_term_is_exact() {
    let predicate = compile_filter("\"50% off\"", Dialect::SQLITE).unwrap();
    assert_eq!(
        predicate.conditions,
        vec![Condition {
            column: Column::Title,
            comparator: Comparator::Equals,
            value: SqlValue::String("50% off".to_string()),
        }]
    );
}

#[test]
fn test_compile_unquoted_words_are_anded() {
    let predicate = compile_filter("I love % dog", Dialect::SQLITE).unwrap();
    let values: Vec<SqlValue> = predicate.conditions.iter().map(|c| c.value.clone()).collect();
    assert_eq!(
        values,
        vec![
            SqlValue::String("I".to_string()),
            SqlValue::String("love".to_string()),
            SqlValue::String("\\%".to_string()),
            SqlValue::String("dog".to_string()),
        ]
    );
    assert!(predicate
        .conditions
        .iter()
        .all(|c| c.comparator == Comparator::Contains));
}

#[test]
fn test_compile_field_clauses() {
    let predicate =
        compile_filter("path:\"1990/04\" public:true favorite:false month:4", Dialect::SQLITE)
            .unwrap();
    assert_eq!(
        predicate.conditions,
        vec![
            Condition {
                column: Column::Path,
                comparator: Comparator::Equals,
                value: SqlValue::String("1990/04".to_string()),
            },
            Condition {
                column: Column::Private,
                comparator: Comparator::Equals,
                value: SqlValue::Bool(false),
            },
            Condition {
                column: Column::Favorite,
                comparator: Comparator::Equals,
                value: SqlValue::Bool(false),
            },
            Condition {
                column: Column::Month,
                comparator: Comparator::Equals,
                value: SqlValue::Integer(4),
            },
        ]
    );
}

#[test]
fn test_compile_folder_and_ext() {
    let predicate = compile_filter("folder:2016_06 ext:jpg ext:.png", Dialect::SQLITE).unwrap();
    assert_eq!(
        predicate.conditions,
        vec![
            Condition {
                column: Column::Path,
                comparator: Comparator::StartsWith,
                value: SqlValue::String("2016\\_06".to_string()),
            },
            Condition {
                column: Column::Name,
                comparator: Comparator::EndsWith,
                value: SqlValue::String(".jpg".to_string()),
            },
            Condition {
                column: Column::Name,
                comparator: Comparator::EndsWith,
                value: SqlValue::String(".png".to_string()),
            },
        ]
    );
}

#[test]
fn test_compile_latlng_bounds() {
    let predicate = compile_filter("latlng:\"48,14,47,13\"", Dialect::SQLITE).unwrap();
    let shape: Vec<(Column, Comparator)> = predicate
        .conditions
        .iter()
        .map(|c| (c.column, c.comparator))
        .collect();
    assert_eq!(
        shape,
        vec![
            (Column::Latitude, Comparator::AtLeast),
            (Column::Latitude, Comparator::AtMost),
            (Column::Longitude, Comparator::AtLeast),
            (Column::Longitude, Comparator::AtMost),
        ]
    );
    match predicate.conditions[1].value {
        SqlValue::Float(north) => assert!((north - 48.0001).abs() < 1e-9),
        ref other => panic!("expected float, got {:?}", other),
    }
}

#[test]
fn test_compile_empty_filter_matches_all() {
    let predicate = compile_filter("   ", Dialect::POSTGRES).unwrap();
    assert!(predicate.matches_all());
}

#[test]
fn test_compile_is_deterministic() {
    let raw = "country:at year:2016 \"Golden Hour\" sale% folder:2016/0_";
    for dialect in Dialect::ALL {
        let first = compile_filter(raw, dialect).unwrap();
        let second = compile_filter(raw, dialect).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_compile_from_clauses_matches_compile_filter() {
    let raw = "year:2016 Pets";
    let clauses = classify(&tokenize(raw).unwrap()).unwrap();
    assert_eq!(
        compile(&clauses, Dialect::MYSQL),
        compile_filter(raw, Dialect::MYSQL).unwrap()
    );
}

#[test]
fn test_compile_uses_dialect_escape_character() {
    let bang = Dialect {
        escape: '!',
        ..Dialect::SQLITE
    };
    let predicate = compile_filter("50%! sale", bang).unwrap();
    assert_eq!(predicate.escape, '!');
    assert_eq!(
        predicate.conditions[0].value,
        SqlValue::String("50!%!!".to_string())
    );
}

#[test]
fn test_pattern_queries_unescape_to_literal_text() {
    for dialect in Dialect::ALL {
        for text in PATTERN_QUERIES {
            let predicate = compile_filter(text, dialect).unwrap();
            let words: Vec<&str> = text.split_whitespace().collect();
            assert_eq!(predicate.conditions.len(), words.len(), "{}", text);
            for (condition, word) in predicate.conditions.iter().zip(words) {
                match &condition.value {
                    SqlValue::String(escaped) => {
                        assert_eq!(dialect.unescape_pattern(escaped), word)
                    }
                    other => panic!("expected string, got {:?}", other),
                }
            }

            let quoted = compile_filter(&format!("\"{}\"", text), dialect).unwrap();
            assert_eq!(
                quoted.conditions,
                vec![Condition {
                    column: Column::Title,
                    comparator: Comparator::Equals,
                    value: SqlValue::String(text.to_string()),
                }]
            );
        }
    }
}

// Dialect rendering

#[test]
fn test_render_sqlite() {
    let predicate = compile_filter("%gold year:2016", Dialect::SQLITE).unwrap();
    let fragment = render(&predicate, Dialect::SQLITE, &PlainColumns);
    assert_eq!(fragment.sql, "title LIKE ? ESCAPE '\\' AND year = ?");
    assert_eq!(
        fragment.binds,
        vec![
            SqlValue::String("%\\%gold%".to_string()),
            SqlValue::Integer(2016)
        ]
    );
}

#[test]
fn test_render_mysql_doubles_backslash_in_escape_clause() {
    let predicate = compile_filter("%gold year:2016", Dialect::MYSQL).unwrap();
    let fragment = render(&predicate, Dialect::MYSQL, &PlainColumns);
    assert_eq!(fragment.sql, "title LIKE ? ESCAPE '\\\\' AND year = ?");
}

#[test]
fn test_render_postgres_numbered_placeholders() {
    let predicate = compile_filter("%gold year:2016 folder:1990", Dialect::POSTGRES).unwrap();
    let fragment = render(&predicate, Dialect::POSTGRES, &PlainColumns);
    assert_eq!(
        fragment.sql,
        "title ILIKE $1 ESCAPE '\\' AND year = $2 AND path ILIKE $3 ESCAPE '\\'"
    );
    assert_eq!(fragment.binds[2], SqlValue::String("1990%".to_string()));

    let shifted = render_with_offset(&predicate, Dialect::POSTGRES, &PlainColumns, 3);
    assert!(shifted.sql.starts_with("title ILIKE $4 "));
    assert!(shifted.sql.contains("year = $5"));
}

#[test]
fn test_render_suffix_pattern() {
    let predicate = compile_filter("ext:jpg", Dialect::SQLITE).unwrap();
    let fragment = render(&predicate, Dialect::SQLITE, &PlainColumns);
    assert_eq!(fragment.sql, "name LIKE ? ESCAPE '\\'");
    assert_eq!(fragment.binds, vec![SqlValue::String("%.jpg".to_string())]);
}

#[test]
fn test_render_never_inlines_values() {
    let predicate = compile_filter("\"'; DROP TABLE photos; --\" x'y", Dialect::SQLITE).unwrap();
    let fragment = render(&predicate, Dialect::SQLITE, &PlainColumns);
    assert!(!fragment.sql.contains("DROP"));
    assert!(!fragment.sql.contains("x'y"));
    assert_eq!(fragment.binds.len(), 2);
}

#[test]
fn test_render_empty_predicate() {
    let predicate = compile_filter("", Dialect::SQLITE).unwrap();
    let fragment = render(&predicate, Dialect::SQLITE, &PlainColumns);
    assert_eq!(fragment.sql, "1 = 1");
    assert!(fragment.binds.is_empty());
}

#[test]
fn test_escape_clause_quotes_single_quote() {
    assert_eq!(Dialect::SQLITE.escape_clause('\''), "ESCAPE ''''");
    assert_eq!(Dialect::SQLITE.escape_clause('!'), "ESCAPE '!'");
}

#[test]
fn test_writer_numbering() {
    let mut writer = SqlWriter::new(Dialect::POSTGRES);
    assert_eq!(writer.bind(SqlValue::Integer(1)), "$1");
    assert_eq!(writer.bind(SqlValue::Integer(2)), "$2");
    assert_eq!(writer.into_binds().len(), 2);

    let mut writer = SqlWriter::new(Dialect::SQLITE);
    assert_eq!(writer.bind(SqlValue::Bool(true)), "?");
}

#[test]
fn test_batch_sizes() {
    assert_eq!(Dialect::SQLITE.batch_size(), 333);
    assert_eq!(Dialect::MYSQL.batch_size(), 1000);
    assert_eq!(Dialect::POSTGRES.batch_size(), 1000);
}

#[test]
fn test_dialect_lookup() {
    assert_eq!(Dialect::from_name("Postgres"), Some(Dialect::POSTGRES));
    assert_eq!(Dialect::from_name("oracle"), None);
    assert_eq!(Dialect::from_url("sqlite::memory:"), Some(Dialect::SQLITE));
    assert_eq!(
        Dialect::from_url("postgres://user@localhost/photos"),
        Some(Dialect::POSTGRES)
    );
    assert_eq!(Dialect::from_url("mysql://localhost/photos"), Some(Dialect::MYSQL));
    assert_eq!(Dialect::from_url("redis://localhost"), None);
}

#[test]
fn test_sqlite_compatible_dialects() {
    assert!(Dialect::SQLITE.is_sqlite_compatible());
    assert!(!Dialect::MYSQL.is_sqlite_compatible());
    assert!(!Dialect::POSTGRES.is_sqlite_compatible());
    assert!(Dialect {
        escape: '!',
        batch_size: 10,
        ..Dialect::SQLITE
    }
    .is_sqlite_compatible());
    assert!(!Dialect {
        escape: '_',
        ..Dialect::SQLITE
    }
    .is_sqlite_compatible());
    assert!(!Dialect {
        wildcard: '*',
        ..Dialect::SQLITE
    }
    .is_sqlite_compatible());
}

#[test]
fn test_escape_round_trip() {
    for dialect in Dialect::ALL {
        for text in ["100%_done\\", "plain", "%%__"] {
            assert_eq!(dialect.unescape_pattern(&dialect.escape_pattern(text)), text);
        }
    }
}
