//! Users repository for database operations

use std::collections::HashMap;

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::BorrowStatus,
        user::{CreateAccountRequest, User, UserQuery, UserRemoval, UserRole, UserStatus},
        Transition,
    },
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// List users, optionally restricted to one status
    pub async fn list(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        let users = match query.status {
            Some(status) => {
                sqlx::query_as::<_, User>(
                    "SELECT * FROM users WHERE status = $1 ORDER BY created_at, full_name",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at, full_name")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(users)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Insert a new account awaiting review
    pub async fn create_pending(&self, request: &CreateAccountRequest) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, full_name, email, status, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.full_name.trim())
        .bind(request.email.trim())
        .bind(UserStatus::Pending)
        .bind(UserRole::User)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Email already registered".to_string())
            }
            other => AppError::Database(other),
        })?;

        Ok(user)
    }

    /// Approve an account. Returns the user as stored after the call.
    pub async fn approve(&self, id: Uuid) -> AppResult<(User, Transition)> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;

        let transition = user.status.approve();
        if transition == Transition::Unchanged {
            return Ok((user, transition));
        }

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(UserStatus::Approved)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((user, transition))
    }

    /// Remove a user and their borrow history.
    ///
    /// `check` runs against the locked row before anything is written. Copies
    /// still BORROWED by the user go back on the shelf, never past
    /// `total_copies`. Locks are taken user, borrow records, then books: the
    /// same record-before-book order a return uses.
    pub async fn remove<F>(&self, id: Uuid, check: F) -> AppResult<UserRemoval>
    where
        F: FnOnce(&User) -> AppResult<()>,
    {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;

        check(&user)?;

        let records: Vec<(Uuid, BorrowStatus)> = sqlx::query_as(
            "SELECT book_id, status FROM borrow_records WHERE user_id = $1 ORDER BY id FOR UPDATE",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let mut held: HashMap<Uuid, i32> = HashMap::new();
        for (book_id, status) in &records {
            if *status == BorrowStatus::Borrowed {
                *held.entry(*book_id).or_default() += 1;
            }
        }

        let mut restored_copies = 0i64;
        if !held.is_empty() {
            let book_ids: Vec<Uuid> = held.keys().copied().collect();
            let shelves: Vec<(Uuid, i32, i32)> = sqlx::query_as(
                r#"
                SELECT id, available_copies, total_copies
                FROM books
                WHERE id = ANY($1)
                ORDER BY id
                FOR UPDATE
                "#,
            )
            .bind(&book_ids)
            .fetch_all(&mut *tx)
            .await?;

            for (book_id, available, total) in shelves {
                let count = held.get(&book_id).copied().unwrap_or(0);
                let after = shelf_after_restore(available, total, count);
                if after == available {
                    continue;
                }

                sqlx::query("UPDATE books SET available_copies = $1 WHERE id = $2")
                    .bind(after)
                    .bind(book_id)
                    .execute(&mut *tx)
                    .await?;
                restored_copies += i64::from(after - available);
            }
        }

        let deleted_borrows = sqlx::query("DELETE FROM borrow_records WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(UserRemoval {
            user_id: id,
            deleted_borrows,
            restored_copies,
        })
    }
}

/// Shelf count once `count` borrowed copies come back, capped at the stock
fn shelf_after_restore(available: i32, total: i32, count: i32) -> i32 {
    available.saturating_add(count).min(total).max(available)
}
