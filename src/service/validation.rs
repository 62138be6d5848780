//! Request validation against the declared book schema.

use crate::model::{field_spec, Book, FieldSpec, FieldType, Format, BOOK_FIELDS};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

static ISBN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[0-9]{10}|[0-9]{13})$").expect("isbn pattern"));

// scheme ":" followed by unreserved / reserved / pct-encoded characters (RFC 3986)
static URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:(?:[A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=]|%[0-9A-Fa-f]{2})+$")
        .expect("uri pattern")
});

/// Exactly 10 or exactly 13 ASCII digits. No checksum, no separators.
pub fn is_valid_isbn(value: &str) -> bool {
    ISBN.is_match(value)
}

pub fn is_valid_uri(value: &str) -> bool {
    URI.is_match(value)
}

/// Ordered violation messages from one validation pass. Each message starts with
/// the field it is about.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn push(&mut self, message: String) {
        self.0.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Violations {
    fn from(messages: Vec<String>) -> Self {
        Self(messages)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

pub struct BookValidator;

impl BookValidator {
    /// Validate an untrusted body against the full book schema. Every field is
    /// checked; the result is either the typed book or all violations found.
    pub fn validate(body: &Value) -> Result<Book, Violations> {
        let Some(obj) = body.as_object() else {
            return Err(Violations::from(vec![
                "body must be a JSON object".to_string(),
            ]));
        };

        let mut violations = Violations::default();
        for spec in BOOK_FIELDS {
            validate_field(spec, obj.get(spec.name), &mut violations);
        }
        for key in obj.keys() {
            if field_spec(key).is_none() {
                violations.push(format!("{} is not an allowed property", key));
            }
        }
        if !violations.is_empty() {
            return Err(violations);
        }

        build_book(obj).ok_or_else(|| {
            Violations::from(vec!["body does not match the book schema".to_string()])
        })
    }
}

fn validate_field(spec: &FieldSpec, value: Option<&Value>, violations: &mut Violations) {
    let col = spec.name;
    let rule = &spec.rule;
    let value = match value {
        None | Some(Value::Null) => {
            if rule.required {
                violations.push(format!("{} is required", col));
            }
            return;
        }
        Some(v) => v,
    };

    match spec.field_type {
        FieldType::String => {
            let Some(s) = value.as_str() else {
                violations.push(format!("{} must be a {}", col, spec.field_type.name()));
                return;
            };
            if let Some(min) = rule.min_length {
                if s.chars().count() < min {
                    violations.push(format!("{} must be at least {} characters", col, min));
                }
            }
            if let Some(format) = rule.format {
                validate_format(col, s, format, violations);
            }
        }
        FieldType::Integer => {
            let Some(n) = as_integer(value) else {
                violations.push(format!("{} must be an {}", col, spec.field_type.name()));
                return;
            };
            if let Some(min) = rule.minimum {
                if n < min {
                    violations.push(format!("{} must be at least {}", col, min));
                }
            }
            if let Some(max) = rule.maximum {
                if n > max {
                    violations.push(format!("{} must be at most {}", col, max));
                }
            }
        }
    }
}

fn validate_format(col: &str, s: &str, format: Format, violations: &mut Violations) {
    match format {
        Format::Isbn => {
            if !is_valid_isbn(s) {
                violations.push(format!(
                    "{} must be a string of exactly 10 or 13 digits",
                    col
                ));
            }
        }
        Format::Uri => {
            if !is_valid_uri(s) {
                violations.push(format!("{} must be a valid URI", col));
            }
        }
    }
}

/// Integral JSON numbers, including floats with no fractional part.
fn as_integer(v: &Value) -> Option<i64> {
    if let Some(n) = v.as_i64() {
        return Some(n);
    }
    if v.is_u64() {
        return Some(i64::MAX);
    }
    let f = v.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn build_book(obj: &Map<String, Value>) -> Option<Book> {
    let text = |name: &str| obj.get(name).and_then(Value::as_str).map(String::from);
    let int = |name: &str| {
        obj.get(name)
            .and_then(as_integer)
            .and_then(|n| i32::try_from(n).ok())
    };
    Some(Book {
        isbn: text("isbn")?,
        amazon_url: text("amazon_url")?,
        author: text("author")?,
        language: text("language")?,
        pages: int("pages")?,
        publisher: text("publisher")?,
        title: text("title")?,
        year: int("year")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn power_up() -> Value {
        json!({
            "isbn": "0691161518",
            "amazon_url": "http://a.co/eobPtX2",
            "author": "Matthew Lane",
            "language": "english",
            "pages": 264,
            "publisher": "Princeton University Press",
            "title": "Power-Up: Unlocking the Hidden Mathematics in Video Games",
            "year": 2017
        })
    }

    fn violations_for(body: Value) -> Vec<String> {
        BookValidator::validate(&body).unwrap_err().into_inner()
    }

    #[test]
    fn isbn_accepts_ten_or_thirteen_digits_only() {
        assert!(is_valid_isbn("0691161518"));
        assert!(is_valid_isbn("9780691161518"));
        assert!(!is_valid_isbn("5489678"));
        assert!(!is_valid_isbn("06911615181"));
        assert!(!is_valid_isbn("069116151X"));
        assert!(!is_valid_isbn("0-691-16151-8"));
        assert!(!is_valid_isbn(""));
        assert!(!is_valid_isbn("0691161518\n"));
    }

    #[test]
    fn uri_requires_a_scheme_and_no_whitespace() {
        assert!(is_valid_uri("http://a.co/eobPtX2"));
        assert!(is_valid_uri("https://www.amazon.com/dp/0691161518?tag=x%20y"));
        assert!(is_valid_uri("urn:isbn:0691161518"));
        assert!(!is_valid_uri("a.co/eobPtX2"));
        assert!(!is_valid_uri("http://a.co/has space"));
        assert!(!is_valid_uri("1http://a.co"));
        assert!(!is_valid_uri("http:"));
    }

    #[test]
    fn valid_body_becomes_a_book() {
        let book = BookValidator::validate(&power_up()).unwrap();
        assert_eq!(book.isbn, "0691161518");
        assert_eq!(book.pages, 264);
        assert_eq!(book.year, 2017);
        assert_eq!(serde_json::to_value(&book).unwrap(), power_up());
    }

    #[test]
    fn integral_floats_are_accepted_as_integers() {
        let mut body = power_up();
        body["pages"] = json!(264.0);
        assert_eq!(BookValidator::validate(&body).unwrap().pages, 264);

        body["pages"] = json!(264.5);
        assert_eq!(violations_for(body), ["pages must be an integer"]);
    }

    #[test]
    fn short_isbn_names_the_field() {
        let mut body = power_up();
        body["isbn"] = json!("5489678");
        let violations = violations_for(body);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].starts_with("isbn"));
    }

    #[test]
    fn reports_every_violation_in_declaration_order() {
        let body = json!({
            "isbn": 691161518,
            "amazon_url": "not a uri",
            "language": "",
            "pages": 0,
            "publisher": "Princeton University Press",
            "title": "Power-Up",
            "year": -1,
            "subtitle": "extra"
        });
        assert_eq!(
            violations_for(body),
            [
                "isbn must be a string",
                "amazon_url must be a valid URI",
                "author is required",
                "language must be at least 1 characters",
                "pages must be at least 1",
                "year must be at least 0",
                "subtitle is not an allowed property",
            ]
        );
    }

    #[test]
    fn every_missing_field_is_reported() {
        let violations = violations_for(json!({}));
        assert_eq!(violations.len(), BOOK_FIELDS.len());
        assert!(violations.iter().all(|v| v.ends_with("is required")));
    }

    #[test]
    fn null_counts_as_missing() {
        let mut body = power_up();
        body["author"] = Value::Null;
        assert_eq!(violations_for(body), ["author is required"]);
    }

    #[test]
    fn integers_must_fit_the_column() {
        let mut body = power_up();
        body["pages"] = json!(3_000_000_000i64);
        body["year"] = json!(u64::MAX);
        assert_eq!(
            violations_for(body),
            ["pages must be at most 2147483647", "year must be at most 2147483647"]
        );
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert_eq!(violations_for(json!([1, 2])), ["body must be a JSON object"]);
        assert_eq!(violations_for(Value::Null), ["body must be a JSON object"]);
    }
}
