//! The book row and its declared request schema.

use serde::{Deserialize, Serialize};

/// One row of the `books` table, keyed by `isbn`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    pub year: i32,
}

/// JSON type a field must carry before any rule is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
        }
    }
}

/// Named format constraints understood by the validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Isbn,
    Uri,
}

/// Per-field constraints. Mirrors the column rules of a table config, minus the
/// ones a book never uses.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidationRule {
    pub required: bool,
    pub format: Option<Format>,
    pub min_length: Option<usize>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub rule: ValidationRule,
}

const fn text(name: &'static str, format: Option<Format>) -> FieldSpec {
    FieldSpec {
        name,
        field_type: FieldType::String,
        rule: ValidationRule {
            required: true,
            format,
            min_length: if format.is_none() { Some(1) } else { None },
            minimum: None,
            maximum: None,
        },
    }
}

const fn integer(name: &'static str, minimum: i64) -> FieldSpec {
    FieldSpec {
        name,
        field_type: FieldType::Integer,
        rule: ValidationRule {
            required: true,
            format: None,
            min_length: None,
            minimum: Some(minimum),
            maximum: Some(i32::MAX as i64),
        },
    }
}

/// The Book schema in declaration order. Violations are reported in this order.
pub const BOOK_FIELDS: &[FieldSpec] = &[
    text("isbn", Some(Format::Isbn)),
    text("amazon_url", Some(Format::Uri)),
    text("author", None),
    text("language", None),
    integer("pages", 1),
    text("publisher", None),
    text("title", None),
    integer("year", 0),
];

pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    BOOK_FIELDS.iter().find(|f| f.name == name)
}
