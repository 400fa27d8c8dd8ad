//! Borrow record model and related types

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Loan lifecycle: BORROWED is the only state a record can leave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BorrowStatus {
    Borrowed,
    Returned,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Borrowed => "BORROWED",
            BorrowStatus::Returned => "RETURNED",
        }
    }

    /// BORROWED -> RETURNED; a returned record is terminal
    pub fn ensure_returnable(self) -> AppResult<()> {
        match self {
            BorrowStatus::Borrowed => Ok(()),
            BorrowStatus::Returned => Err(AppError::Conflict(
                "Borrow record already returned".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BorrowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BORROWED" => Ok(BorrowStatus::Borrowed),
            "RETURNED" => Ok(BorrowStatus::Returned),
            _ => Err(format!("Invalid borrow status: {}", s)),
        }
    }
}

text_column!(BorrowStatus);

/// Borrow record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub status: BorrowStatus,
    pub return_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Borrow record joined with borrower and book for display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: Option<String>,
    pub book_id: Uuid,
    pub book_title: Option<String>,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub status: BorrowStatus,
    pub return_date: Option<DateTime<Utc>>,
    pub is_overdue: bool,
}

/// Who initiated a borrow; decides the due date and the wording of refusals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowChannel {
    /// A reader borrowing for themselves
    SelfService,
    /// Staff issuing a copy at the desk with an explicit due date
    Desk,
}

impl BorrowChannel {
    pub fn not_approved_message(self) -> &'static str {
        match self {
            BorrowChannel::SelfService => "Your account is not approved yet",
            BorrowChannel::Desk => "User is not approved and cannot borrow books",
        }
    }
}

/// Validated borrow, ready to be written
#[derive(Debug, Clone)]
pub struct NewBorrow {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub due_date: DateTime<Utc>,
    pub channel: BorrowChannel,
}

/// Desk issuance request
#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueBookRequest {
    pub user_id: Uuid,
    pub book_id: Uuid,
    /// `YYYY-MM-DD` (due at the end of that day, UTC) or an RFC 3339 timestamp
    pub due_date: String,
}

/// Self-service borrow request
#[derive(Debug, Deserialize, ToSchema)]
pub struct BorrowBookRequest {
    pub user_id: Uuid,
    pub book_id: Uuid,
}

/// Borrow list filter
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BorrowQuery {
    /// Defaults to BORROWED (books currently out)
    pub status: Option<BorrowStatus>,
}

/// Parse a caller-supplied due date.
///
/// Dates in the past are refused; a bare date is due at the last second of
/// that day.
pub fn parse_due_date(raw: &str, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();

    let due = if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        ts.with_timezone(&Utc)
    } else if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default();
        day.and_time(end_of_day).and_utc()
    } else {
        return Err(AppError::Validation(format!(
            "Invalid due date '{}': expected YYYY-MM-DD or RFC 3339",
            raw
        )));
    };

    if due < now {
        return Err(AppError::Validation(format!(
            "Due date {} is in the past",
            due.format("%Y-%m-%d")
        )));
    }

    Ok(due)
}

/// Due date for a self-service borrow
pub fn self_service_due_date(now: DateTime<Utc>, duration_days: i64) -> DateTime<Utc> {
    now + Duration::days(duration_days)
}
