//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::Transition;
use crate::error::{AppError, AppResult};

/// Account review state.
///
/// A rejected signup has no state of its own: rejection deletes the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Pending,
    Approved,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "PENDING",
            UserStatus::Approved => "APPROVED",
        }
    }

    /// PENDING -> APPROVED; approving an approved account changes nothing
    pub fn approve(self) -> Transition {
        match self {
            UserStatus::Pending => Transition::Applied,
            UserStatus::Approved => Transition::Unchanged,
        }
    }

    /// Only accounts still awaiting review can be rejected
    pub fn ensure_rejectable(self) -> AppResult<()> {
        match self {
            UserStatus::Pending => Ok(()),
            UserStatus::Approved => Err(AppError::BusinessRule(
                "Account is already approved; delete the user instead".to_string(),
            )),
        }
    }

    pub fn can_borrow(self) -> bool {
        self == UserStatus::Approved
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(UserStatus::Pending),
            "APPROVED" => Ok(UserStatus::Approved),
            _ => Err(format!("Invalid user status: {}", s)),
        }
    }
}

text_column!(UserStatus);

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USER" => Ok(UserRole::User),
            "ADMIN" => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

text_column!(UserRole);

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub status: UserStatus,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Admin accounts are never removed through the user management screens
    pub fn ensure_deletable(&self) -> AppResult<()> {
        if self.role == UserRole::Admin {
            return Err(AppError::BusinessRule(
                "Admin accounts cannot be deleted".to_string(),
            ));
        }
        Ok(())
    }
}

/// Signup request; lands in the account request queue as PENDING
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// User list filter
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Restrict to PENDING or APPROVED accounts
    pub status: Option<UserStatus>,
}

/// Result of removing a user (reject or delete)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserRemoval {
    pub user_id: Uuid,
    /// Borrow records deleted with the user
    pub deleted_borrows: u64,
    /// Copies given back to the catalog from records still BORROWED
    pub restored_copies: i64,
}
