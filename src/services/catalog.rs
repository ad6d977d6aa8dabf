//! Catalog management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, BookFields, BookFilter},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Check required attributes and column limits
    pub fn validate(fields: &BookFields) -> AppResult<()> {
        fields.validate()?;
        Ok(())
    }

    /// Search books with filters
    pub async fn search_books(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let books = self.repository.books_search(filter).await?;
        tracing::debug!(
            "Catalog search returned {} book(s) (filtered: {})",
            books.len(),
            !filter.is_empty()
        );
        Ok(books)
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books_get_by_id(id).await
    }

    /// Create a new book
    pub async fn create_book(&self, fields: BookFields) -> AppResult<Book> {
        Self::validate(&fields)?;
        let book = self.repository.books_create(&fields).await?;
        tracing::info!("Catalog create: book id={} title={:?}", book.id, book.title);
        Ok(book)
    }

    /// Replace every attribute of an existing book
    pub async fn update_book(&self, id: i64, fields: BookFields) -> AppResult<Book> {
        Self::validate(&fields)?;
        let book = self.repository.books_update(id, &fields).await?;
        tracing::info!("Catalog update: book id={}", id);
        Ok(book)
    }

    /// Check the database is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }

    /// Delete a book
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        self.repository.books_delete(id).await?;
        tracing::info!("Catalog delete: book id={}", id);
        Ok(())
    }
}
