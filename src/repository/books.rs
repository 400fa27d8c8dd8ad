//! Books repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List the catalog ordered by title
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let sql = if query.available_only.unwrap_or(false) {
            "SELECT * FROM books WHERE available_copies > 0 ORDER BY title, author"
        } else {
            "SELECT * FROM books ORDER BY title, author"
        };

        let books = sqlx::query_as::<_, Book>(sql).fetch_all(&self.pool).await?;
        Ok(books)
    }

    /// Create a book with every copy on the shelf
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, title, author, genre, rating, description, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book.title.trim())
        .bind(book.author.trim())
        .bind(book.genre.trim())
        .bind(book.rating.unwrap_or(0))
        .bind(&book.description)
        .bind(book.total_copies)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Delete a book and its returned borrow history.
    ///
    /// Refused while any copy is out. Returns the number of history rows removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        let on_loan: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE book_id = $1 AND status = 'BORROWED'",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if on_loan > 0 {
            return Err(AppError::BusinessRule(format!(
                "Book has {} borrowed cop{} outstanding",
                on_loan,
                if on_loan == 1 { "y" } else { "ies" }
            )));
        }

        let history = sqlx::query("DELETE FROM borrow_records WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(history)
    }
}
