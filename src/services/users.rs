//! Account review and user management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        user::{CreateAccountRequest, User, UserQuery, UserRemoval, UserStatus},
        BorrowDetails, Transition,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Accounts awaiting review, oldest first
    pub async fn list_pending(&self) -> AppResult<Vec<User>> {
        self.repository
            .users
            .list(&UserQuery {
                status: Some(UserStatus::Pending),
            })
            .await
    }

    pub async fn list_users(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        self.repository.users.list(query).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Borrow history for a user
    pub async fn user_borrows(&self, id: Uuid) -> AppResult<Vec<BorrowDetails>> {
        // Verify user exists
        self.repository.users.get_by_id(id).await?;
        self.repository.borrows.for_user(id).await
    }

    /// File a signup; the account starts PENDING
    pub async fn request_account(&self, request: CreateAccountRequest) -> AppResult<User> {
        request.validate()?;

        if self.repository.users.email_exists(request.email.trim()).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let user = self.repository.users.create_pending(&request).await?;
        tracing::info!("Account request filed: user={} email={}", user.id, user.email);
        Ok(user)
    }

    /// Approve a pending account. Approving twice is a no-op.
    pub async fn approve(&self, id: Uuid) -> AppResult<User> {
        let (user, transition) = self.repository.users.approve(id).await?;

        match transition {
            Transition::Applied => tracing::info!("Account approved: user={}", id),
            Transition::Unchanged => tracing::debug!("Account already approved: user={}", id),
        }

        Ok(user)
    }

    /// Reject a pending account, removing it
    pub async fn reject(&self, id: Uuid) -> AppResult<UserRemoval> {
        let removal = self
            .repository
            .users
            .remove(id, |user| user.status.ensure_rejectable())
            .await?;

        tracing::info!(
            "Account rejected: user={} deleted_borrows={} restored_copies={}",
            id,
            removal.deleted_borrows,
            removal.restored_copies
        );
        Ok(removal)
    }

    /// Delete a user and their borrow records
    pub async fn delete_user(&self, id: Uuid) -> AppResult<UserRemoval> {
        let removal = self
            .repository
            .users
            .remove(id, User::ensure_deletable)
            .await?;

        if removal.restored_copies > 0 {
            tracing::warn!(
                "User {} deleted with {} copies still borrowed; copies returned to the shelf",
                id,
                removal.restored_copies
            );
        }
        tracing::info!(
            "User deleted: user={} deleted_borrows={}",
            id,
            removal.deleted_borrows
        );
        Ok(removal)
    }
}
