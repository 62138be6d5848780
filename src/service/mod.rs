//! BookService plus the request validator it runs on every write.

mod book;
mod validation;
pub use book::BookService;
pub use validation::{is_valid_isbn, is_valid_uri, BookValidator, Violations};
