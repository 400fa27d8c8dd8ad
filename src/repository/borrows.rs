//! Borrow records repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::{BorrowChannel, BorrowDetails, BorrowRecord, BorrowStatus, NewBorrow},
        user::UserStatus,
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT r.id, r.user_id, u.full_name AS user_name, r.book_id, b.title AS book_title,
           r.borrow_date, r.due_date, r.status, r.return_date,
           (r.status = 'BORROWED' AND r.due_date < NOW()) AS is_overdue
    FROM borrow_records r
    LEFT JOIN users u ON u.id = r.user_id
    LEFT JOIN books b ON b.id = r.book_id
"#;

/// Outcome of a return, including whether the shelf count moved
#[derive(Debug, Clone)]
pub struct ReturnedBorrow {
    pub record: BorrowRecord,
    /// False when the book row is gone or already at `total_copies`
    pub copy_restored: bool,
}

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BorrowRecord> {
        sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrow_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    /// List borrow records in a given status, most urgent first
    pub async fn list(&self, status: BorrowStatus) -> AppResult<Vec<BorrowDetails>> {
        let sql = format!("{} WHERE r.status = $1 ORDER BY r.due_date, r.borrow_date", DETAILS_SELECT);

        let records = sqlx::query_as::<_, BorrowDetails>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Full borrow history of one user, newest first
    pub async fn for_user(&self, user_id: Uuid) -> AppResult<Vec<BorrowDetails>> {
        let sql = format!("{} WHERE r.user_id = $1 ORDER BY r.borrow_date DESC", DETAILS_SELECT);

        let records = sqlx::query_as::<_, BorrowDetails>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Lend a copy: check eligibility, take one copy off the shelf and record
    /// the loan, all in one transaction.
    pub async fn create(&self, borrow: &NewBorrow) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        let status: Option<UserStatus> =
            sqlx::query_scalar("SELECT status FROM users WHERE id = $1 FOR SHARE")
                .bind(borrow.user_id)
                .fetch_optional(&mut *tx)
                .await?;

        match status {
            None => return Err(AppError::NotFound("User not found".to_string())),
            Some(status) if !status.can_borrow() => {
                return Err(AppError::BusinessRule(
                    borrow.channel.not_approved_message().to_string(),
                ));
            }
            Some(_) => {}
        }

        // Conditional decrement: concurrent borrows of the last copy serialize on the row
        let remaining: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE books
            SET available_copies = available_copies - 1
            WHERE id = $1 AND available_copies > 0
            RETURNING available_copies
            "#,
        )
        .bind(borrow.book_id)
        .fetch_optional(&mut *tx)
        .await?;

        if remaining.is_none() {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                .bind(borrow.book_id)
                .fetch_one(&mut *tx)
                .await?;

            return Err(match (exists, borrow.channel) {
                (false, BorrowChannel::Desk) => AppError::NotFound("Book not found".to_string()),
                _ => AppError::BusinessRule("Book not available".to_string()),
            });
        }

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrow_records (id, user_id, book_id, borrow_date, due_date, status)
            VALUES ($1, $2, $3, NOW(), $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(borrow.user_id)
        .bind(borrow.book_id)
        .bind(borrow.due_date)
        .bind(BorrowStatus::Borrowed)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Close a loan and put the copy back on the shelf
    pub async fn return_record(&self, id: Uuid) -> AppResult<ReturnedBorrow> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_records WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))?;

        record.status.ensure_returnable()?;

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            UPDATE borrow_records
            SET status = $1, return_date = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(BorrowStatus::Returned)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        let restored = sqlx::query(
            r#"
            UPDATE books
            SET available_copies = available_copies + 1
            WHERE id = $1 AND available_copies < total_copies
            "#,
        )
        .bind(record.book_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        Ok(ReturnedBorrow {
            record,
            copy_restored: restored == 1,
        })
    }
}
