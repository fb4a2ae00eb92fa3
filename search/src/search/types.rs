/// AST and predicate types for the photo filter language

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    KeyValue { key: String, value: String }, // key:value, value may have been quoted
    FreeText,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Token text with structural quotes removed, colon included.
    pub raw: String,
    /// The free text, or the value part of a key:value token, was quoted.
    pub quoted: bool,
    /// Char offset of the first character of the token.
    pub offset: usize,
}

/// Closed vocabulary of filter keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Path,
    Folder,
    Name,
    Ext,
    Title,
    Public,
    Private,
    Favorite,
    Country,
    State,
    Year,
    Month,
    Day,
    Category,
    LatLng,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Prefix,
    Suffix,
    Bool,
    Int { min: i64, max: i64 },
    CountryCode,
    Bounds,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::Path,
        Field::Folder,
        Field::Name,
        Field::Ext,
        Field::Title,
        Field::Public,
        Field::Private,
        Field::Favorite,
        Field::Country,
        Field::State,
        Field::Year,
        Field::Month,
        Field::Day,
        Field::Category,
        Field::LatLng,
    ];

    /// Looks up a filter key, ignoring ASCII case.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(key))
    }

    pub fn key(self) -> &'static str {
        match self {
            Field::Path => "path",
            Field::Folder => "folder",
            Field::Name => "name",
            Field::Ext => "ext",
            Field::Title => "title",
            Field::Public => "public",
            Field::Private => "private",
            Field::Favorite => "favorite",
            Field::Country => "country",
            Field::State => "state",
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Category => "category",
            Field::LatLng => "latlng",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Path | Field::Name | Field::Title | Field::State | Field::Category => {
                FieldKind::Text
            }
            Field::Folder => FieldKind::Prefix,
            Field::Ext => FieldKind::Suffix,
            Field::Public | Field::Private | Field::Favorite => FieldKind::Bool,
            Field::Year => FieldKind::Int { min: 1, max: 9999 },
            Field::Month => FieldKind::Int { min: 1, max: 12 },
            Field::Day => FieldKind::Int { min: 1, max: 31 },
            Field::Country => FieldKind::CountryCode,
            Field::LatLng => FieldKind::Bounds,
        }
    }
}

/// Bounding box in degrees, already clamped and widened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsBounds {
    pub north: f64,
    pub east: f64,
    pub south: f64,
    pub west: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Bounds(GpsBounds),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldClause {
    pub field: Field,
    pub value: FieldValue,
    pub quoted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TermClause {
    pub text: String,
    pub exact: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Field(FieldClause),
    Term(TermClause),
}

/// Logical photo columns a condition can target. The entity kind decides
/// which physical column each one resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Title,
    Path,
    Name,
    Private,
    Favorite,
    Country,
    State,
    Year,
    Month,
    Day,
    Category,
    Latitude,
    Longitude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    AtLeast,
    AtMost,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: Column,
    pub comparator: Comparator,
    /// For pattern comparators this is the escaped literal, without the
    /// bounding wildcards the renderer adds.
    pub value: SqlValue,
}

/// Conjunction of conditions, in clause order.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub conditions: Vec<Condition>,
    /// Escape character the pattern values were escaped with.
    pub escape: char,
}

impl Predicate {
    /// True when the predicate has no conditions and matches every row.
    pub fn matches_all(&self) -> bool {
        self.conditions.is_empty()
    }
}
