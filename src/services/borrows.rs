//! Borrow and return service

use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::borrow::{
        parse_due_date, self_service_due_date, BorrowBookRequest, BorrowChannel, BorrowDetails,
        BorrowRecord, BorrowStatus, IssueBookRequest, NewBorrow,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
    config: LoansConfig,
}

impl BorrowsService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self { repository, config }
    }

    /// Borrow records in a status (BORROWED when unspecified)
    pub async fn list(&self, status: Option<BorrowStatus>) -> AppResult<Vec<BorrowDetails>> {
        self.repository
            .borrows
            .list(status.unwrap_or(BorrowStatus::Borrowed))
            .await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BorrowRecord> {
        self.repository.borrows.get_by_id(id).await
    }

    /// Staff issue a copy to an approved user with an explicit due date
    pub async fn issue(&self, request: IssueBookRequest) -> AppResult<BorrowRecord> {
        let due_date = parse_due_date(&request.due_date, Utc::now())?;

        let record = self
            .repository
            .borrows
            .create(&NewBorrow {
                user_id: request.user_id,
                book_id: request.book_id,
                due_date,
                channel: BorrowChannel::Desk,
            })
            .await?;

        tracing::info!(
            "Book issued: borrow={} user={} book={} due={}",
            record.id,
            record.user_id,
            record.book_id,
            record.due_date
        );
        Ok(record)
    }

    /// A reader borrows a book for the configured loan duration.
    ///
    /// Refusals keep their message; anything unexpected is logged and
    /// reported as a generic failure.
    pub async fn borrow(&self, request: BorrowBookRequest) -> AppResult<BorrowRecord> {
        let due_date = self_service_due_date(Utc::now(), self.config.self_service_duration_days);

        let record = self
            .repository
            .borrows
            .create(&NewBorrow {
                user_id: request.user_id,
                book_id: request.book_id,
                due_date,
                channel: BorrowChannel::SelfService,
            })
            .await
            .map_err(|e| mask_unexpected(e, "Failed to borrow book"))?;

        tracing::info!(
            "Book borrowed: borrow={} user={} book={} due={}",
            record.id,
            record.user_id,
            record.book_id,
            record.due_date
        );
        Ok(record)
    }

    /// Close a loan. A second return of the same record is refused and
    /// leaves inventory untouched.
    pub async fn return_book(&self, id: Uuid) -> AppResult<BorrowRecord> {
        let returned = self.repository.borrows.return_record(id).await?;

        if !returned.copy_restored {
            tracing::warn!(
                "Borrow {} returned but book {} was already at full stock; counter left as is",
                id,
                returned.record.book_id
            );
        }
        tracing::info!("Book returned: borrow={} book={}", id, returned.record.book_id);
        Ok(returned.record)
    }
}

/// Keep caller-facing refusals, replace everything else with `generic`
fn mask_unexpected(err: AppError, generic: &str) -> AppError {
    match err {
        AppError::NotFound(_)
        | AppError::Validation(_)
        | AppError::Conflict(_)
        | AppError::BusinessRule(_) => err,
        AppError::Database(_) | AppError::Internal(_) => {
            tracing::error!("{}: {}", generic, err);
            AppError::Internal(generic.to_string())
        }
    }
}
