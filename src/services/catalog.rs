//! Catalog management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook},
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

    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.list(query).await
    }

    pub async fn get_book(&self, id: Uuid) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Add a title to the catalog; all copies start on the shelf
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!(
            "Catalog create: book={} title={:?} copies={}",
            created.id,
            created.title,
            created.total_copies
        );
        Ok(created)
    }

    pub async fn delete_book(&self, id: Uuid) -> AppResult<()> {
        let history = self.repository.books.delete(id).await?;
        tracing::info!("Catalog delete: book={} history_rows={}", id, history);
        Ok(())
    }
}
