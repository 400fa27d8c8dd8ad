//! Dashboard counters

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Admin dashboard figures
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DashboardStats {
    /// Registered users, any status
    pub total_users: i64,
    /// Signups awaiting review
    pub pending_users: i64,
    /// Catalog entries
    pub total_books: i64,
    /// Borrow records currently BORROWED
    pub issued_books: i64,
    /// BORROWED records past their due date
    pub overdue_books: i64,
    /// Sum of copies on the shelf across the catalog
    pub available_copies: i64,
}
