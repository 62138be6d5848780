//! Book operations: validation, then one repository round trip.

use crate::error::AppError;
use crate::model::Book;
use crate::service::BookValidator;
use crate::store::BookRepository;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct BookService {
    repo: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(repo: Arc<dyn BookRepository>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &dyn BookRepository {
        self.repo.as_ref()
    }

    pub async fn list_all(&self) -> Result<Vec<Book>, AppError> {
        let books = self.repo.find_all().await?;
        tracing::debug!(count = books.len(), "listed books");
        Ok(books)
    }

    pub async fn get_by_isbn(&self, isbn: &str) -> Result<Book, AppError> {
        self.repo
            .find_by_key(isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(isbn.to_string()))
    }

    pub async fn create(&self, body: &Value) -> Result<Book, AppError> {
        let book = BookValidator::validate(body).map_err(AppError::Validation)?;
        let stored = self.repo.insert(&book).await?;
        tracing::info!(isbn = %stored.isbn, "book created");
        Ok(stored)
    }

    /// Full replacement of the row keyed by `isbn`. The body's own `isbn` is
    /// written as-is, so an update may move the row to a new key.
    pub async fn update(&self, isbn: &str, body: &Value) -> Result<Book, AppError> {
        if self.repo.find_by_key(isbn).await?.is_none() {
            return Err(AppError::NotFound(isbn.to_string()));
        }
        let book = BookValidator::validate(body).map_err(AppError::Validation)?;
        if book.isbn != isbn {
            tracing::warn!(from = %isbn, to = %book.isbn, "update changes the book key");
        }
        let stored = self
            .repo
            .update_by_key(isbn, &book)
            .await?
            .ok_or_else(|| AppError::NotFound(isbn.to_string()))?;
        tracing::info!(isbn = %stored.isbn, "book updated");
        Ok(stored)
    }

    pub async fn delete_by_isbn(&self, isbn: &str) -> Result<(), AppError> {
        if !self.repo.delete_by_key(isbn).await? {
            return Err(AppError::NotFound(isbn.to_string()));
        }
        tracing::info!(isbn, "book deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryBookRepository;
    use serde_json::json;

    fn service() -> BookService {
        BookService::new(Arc::new(InMemoryBookRepository::new()))
    }

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

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let svc = service();
        let created = svc.create(&power_up()).await.unwrap();
        let fetched = svc.get_by_isbn("0691161518").await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(serde_json::to_value(fetched).unwrap(), power_up());
    }

    #[tokio::test]
    async fn list_is_empty_then_holds_the_insert() {
        let svc = service();
        assert!(svc.list_all().await.unwrap().is_empty());

        let created = svc.create(&power_up()).await.unwrap();
        assert_eq!(svc.list_all().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn invalid_create_stores_nothing() {
        let svc = service();
        let mut body = power_up();
        body["isbn"] = json!("5489678");
        body["pages"] = json!(0);

        match svc.create(&body).await {
            Err(AppError::Validation(v)) => {
                assert_eq!(v.len(), 2);
                assert!(v.iter().next().unwrap().contains("isbn"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert!(svc.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_keys_are_not_found_even_with_bad_bodies() {
        let svc = service();
        assert!(matches!(svc.get_by_isbn("254656").await, Err(AppError::NotFound(_))));
        assert!(matches!(svc.update("254656", &json!({})).await, Err(AppError::NotFound(_))));
        assert!(matches!(svc.update("254656", &power_up()).await, Err(AppError::NotFound(_))));
        assert!(matches!(svc.delete_by_isbn("254656").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_validates_the_full_body() {
        let svc = service();
        svc.create(&power_up()).await.unwrap();

        let err = svc
            .update("0691161518", &json!({"title": "Only a title"}))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(v) => assert_eq!(v.len(), 7),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let svc = service();
        svc.create(&power_up()).await.unwrap();

        let mut body = power_up();
        body["author"] = json!("Brutus The Legend");
        body["pages"] = json!(1337);
        body["year"] = json!(1003);
        let updated = svc.update("0691161518", &body).await.unwrap();
        assert_eq!(updated.author, "Brutus The Legend");
        assert_eq!(svc.get_by_isbn("0691161518").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_may_move_the_key() {
        let svc = service();
        svc.create(&power_up()).await.unwrap();

        let mut body = power_up();
        body["isbn"] = json!("9780691161518");
        svc.update("0691161518", &body).await.unwrap();

        assert!(matches!(svc.get_by_isbn("0691161518").await, Err(AppError::NotFound(_))));
        assert!(svc.get_by_isbn("9780691161518").await.is_ok());
    }

    #[tokio::test]
    async fn update_onto_a_taken_key_conflicts_and_changes_nothing() {
        let svc = service();
        svc.create(&power_up()).await.unwrap();
        let mut other = power_up();
        other["isbn"] = json!("9780691161518");
        other["title"] = json!("Another Power-Up");
        svc.create(&other).await.unwrap();

        let mut body = power_up();
        body["isbn"] = json!("9780691161518");
        body["title"] = json!("Renamed");
        let err = svc.update("0691161518", &body).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        assert_eq!(
            svc.get_by_isbn("0691161518").await.unwrap().title,
            "Power-Up: Unlocking the Hidden Mathematics in Video Games"
        );
        assert_eq!(
            svc.get_by_isbn("9780691161518").await.unwrap().title,
            "Another Power-Up"
        );
        assert_eq!(svc.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let svc = service();
        svc.create(&power_up()).await.unwrap();
        svc.delete_by_isbn("0691161518").await.unwrap();
        assert!(matches!(svc.get_by_isbn("0691161518").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_create_conflicts() {
        let svc = service();
        svc.create(&power_up()).await.unwrap();
        assert!(matches!(svc.create(&power_up()).await, Err(AppError::Conflict(_))));
    }
}
