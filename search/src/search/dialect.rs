use super::types::{Column, Comparator, Condition, Predicate, SqlValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Question, // ?
    Dollar,   // $1, $2, ...
}

/// Pattern-matching and tuning characteristics of a backing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub name: &'static str,
    /// Matches any sequence of characters in a pattern.
    pub wildcard: char,
    /// Matches exactly one character in a pattern.
    pub single_wildcard: char,
    pub escape: char,
    pub batch_size: usize,
    pub placeholder: Placeholder,
    pub pattern_operator: &'static str,
    /// String literals treat backslash as an escape (MySQL default sql_mode).
    pub backslash_literals: bool,
}

impl Dialect {
    pub const SQLITE: Dialect = Dialect {
        name: "sqlite",
        wildcard: '%',
        single_wildcard: '_',
        escape: '\\',
        batch_size: 333,
        placeholder: Placeholder::Question,
        pattern_operator: "LIKE",
        backslash_literals: false,
    };

    pub const MYSQL: Dialect = Dialect {
        name: "mysql",
        wildcard: '%',
        single_wildcard: '_',
        escape: '\\',
        batch_size: 1000,
        placeholder: Placeholder::Question,
        pattern_operator: "LIKE",
        backslash_literals: true,
    };

    pub const POSTGRES: Dialect = Dialect {
        name: "postgres",
        wildcard: '%',
        single_wildcard: '_',
        escape: '\\',
        batch_size: 1000,
        placeholder: Placeholder::Dollar,
        pattern_operator: "ILIKE",
        backslash_literals: false,
    };

    pub const ALL: [Dialect; 3] = [Dialect::SQLITE, Dialect::MYSQL, Dialect::POSTGRES];

    pub fn from_name(name: &str) -> Option<Dialect> {
        Dialect::ALL
            .into_iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Picks the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> Option<Dialect> {
        let scheme = url.split(':').next()?;
        match scheme.to_ascii_lowercase().as_str() {
            "sqlite" => Some(Dialect::SQLITE),
            "mysql" | "mariadb" => Some(Dialect::MYSQL),
            "postgres" | "postgresql" => Some(Dialect::POSTGRES),
            _ => None,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Escapes every character that has pattern meaning for this engine,
    /// including the escape character itself.
    pub fn escape_pattern(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for ch in text.chars() {
            if ch == self.wildcard || ch == self.single_wildcard || ch == self.escape {
                escaped.push(self.escape);
            }
            escaped.push(ch);
        }
        escaped
    }

    /// True when statements rendered for this dialect run on SQLite. Only the
    /// escape character and batch size may differ from [`Dialect::SQLITE`].
    pub fn is_sqlite_compatible(&self) -> bool {
        let sqlite = Dialect::SQLITE;
        self.wildcard == sqlite.wildcard
            && self.single_wildcard == sqlite.single_wildcard
            && self.escape != self.wildcard
            && self.escape != self.single_wildcard
            && self.placeholder == sqlite.placeholder
            && self.pattern_operator == sqlite.pattern_operator
            && self.backslash_literals == sqlite.backslash_literals
    }

    /// Reverses [`Dialect::escape_pattern`].
    #[cfg(test)]
    pub(crate) fn unescape_pattern(&self, escaped: &str) -> String {
        let mut text = String::with_capacity(escaped.len());
        let mut chars = escaped.chars();
        while let Some(ch) = chars.next() {
            if ch == self.escape {
                if let Some(next) = chars.next() {
                    text.push(next);
                    continue;
                }
            }
            text.push(ch);
        }
        text
    }

    /// The `ESCAPE '<c>'` clause, quoted for this engine's string literals.
    pub fn escape_clause(&self, escape: char) -> String {
        let mut literal = String::new();
        if escape == '\'' || (self.backslash_literals && escape == '\\') {
            literal.push(escape);
        }
        literal.push(escape);
        format!("ESCAPE '{}'", literal)
    }
}

/// Resolves logical columns to qualified SQL column names for one entity
/// kind.
pub trait ColumnMap {
    fn column(&self, column: Column) -> &'static str;
}

/// A rendered WHERE fragment and its bind values, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub binds: Vec<SqlValue>,
}

/// Tracks placeholder numbering while a statement is assembled from several
/// fragments.
#[derive(Debug)]
pub struct SqlWriter {
    dialect: Dialect,
    next_idx: usize,
    binds: Vec<SqlValue>,
}

impl SqlWriter {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_offset(dialect, 0)
    }

    /// Starts numbering after `start_offset` placeholders that already exist.
    pub fn with_offset(dialect: Dialect, start_offset: usize) -> Self {
        Self {
            dialect,
            next_idx: start_offset,
            binds: Vec::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Registers a bind value and returns its placeholder.
    pub fn bind(&mut self, value: SqlValue) -> String {
        self.next_idx += 1;
        self.binds.push(value);
        match self.dialect.placeholder {
            Placeholder::Question => "?".to_string(),
            Placeholder::Dollar => format!("${}", self.next_idx),
        }
    }

    pub fn into_binds(self) -> Vec<SqlValue> {
        self.binds
    }
}

/// Renders a predicate for one dialect and entity kind.
pub fn render(predicate: &Predicate, dialect: Dialect, columns: &dyn ColumnMap) -> Fragment {
    render_with_offset(predicate, dialect, columns, 0)
}

/// Like [`render`], numbering placeholders after `start_offset`.
pub fn render_with_offset(
    predicate: &Predicate,
    dialect: Dialect,
    columns: &dyn ColumnMap,
    start_offset: usize,
) -> Fragment {
    let mut writer = SqlWriter::with_offset(dialect, start_offset);
    let sql = render_into(predicate, columns, &mut writer);
    Fragment {
        sql,
        binds: writer.into_binds(),
    }
}

/// Renders a predicate into an existing writer and returns the SQL text.
pub fn render_into(
    predicate: &Predicate,
    columns: &dyn ColumnMap,
    writer: &mut SqlWriter,
) -> String {
    if predicate.matches_all() {
        return "1 = 1".to_string();
    }

    predicate
        .conditions
        .iter()
        .map(|condition| render_condition(condition, predicate.escape, columns, writer))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn render_condition(
    condition: &Condition,
    escape: char,
    columns: &dyn ColumnMap,
    writer: &mut SqlWriter,
) -> String {
    let column = columns.column(condition.column);
    let dialect = writer.dialect();

    match condition.comparator {
        Comparator::Equals => {
            let p = writer.bind(condition.value.clone());
            format!("{} = {}", column, p)
        }
        Comparator::AtLeast => {
            let p = writer.bind(condition.value.clone());
            format!("{} >= {}", column, p)
        }
        Comparator::AtMost => {
            let p = writer.bind(condition.value.clone());
            format!("{} <= {}", column, p)
        }
        Comparator::Contains | Comparator::StartsWith | Comparator::EndsWith => {
            let p = writer.bind(pattern_value(condition, dialect));
            format!(
                "{} {} {} {}",
                column,
                dialect.pattern_operator,
                p,
                dialect.escape_clause(escape)
            )
        }
    }
}

/// Adds the bounding wildcards to an already escaped literal.
fn pattern_value(condition: &Condition, dialect: Dialect) -> SqlValue {
    let escaped = match &condition.value {
        SqlValue::String(s) => s.clone(),
        SqlValue::Integer(i) => i.to_string(),
        SqlValue::Float(f) => f.to_string(),
        SqlValue::Bool(b) => b.to_string(),
    };
    let w = dialect.wildcard;
    let pattern = match condition.comparator {
        Comparator::Contains => format!("{}{}{}", w, escaped, w),
        Comparator::StartsWith => format!("{}{}", escaped, w),
        Comparator::EndsWith => format!("{}{}", w, escaped),
        _ => escaped,
    };
    SqlValue::String(pattern)
}
