//! Aggregate queries for the admin dashboard

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::stats::DashboardStats};

#[derive(Clone)]
pub struct StatsRepository {
    pool: Pool<Postgres>,
}

impl StatsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        let stats = sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM users WHERE status = 'PENDING') AS pending_users,
                (SELECT COUNT(*) FROM books) AS total_books,
                (SELECT COUNT(*) FROM borrow_records WHERE status = 'BORROWED') AS issued_books,
                (SELECT COUNT(*) FROM borrow_records
                  WHERE status = 'BORROWED' AND due_date < NOW()) AS overdue_books,
                (SELECT COALESCE(SUM(available_copies), 0)::BIGINT FROM books) AS available_copies
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
