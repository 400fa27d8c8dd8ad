//! Account request endpoints (signup review queue)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::user::{CreateAccountRequest, User, UserRemoval},
};

/// List accounts awaiting review
#[utoipa::path(
    get,
    path = "/account-requests",
    tag = "accounts",
    responses(
        (status = 200, description = "Pending accounts, oldest first", body = Vec<User>)
    )
)]
pub async fn list_account_requests(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.list_pending().await?;
    Ok(Json(users))
}

/// File a new account request
#[utoipa::path(
    post,
    path = "/account-requests",
    tag = "accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account request filed", body = User),
        (status = 400, description = "Invalid name or email"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_account_request(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state.services.users.request_account(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Approve an account request
#[utoipa::path(
    post,
    path = "/account-requests/{id}/approve",
    tag = "accounts",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Account approved (or already approved)", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn approve_account(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<User>> {
    let user = state.services.users.approve(id).await?;
    Ok(Json(user))
}

/// Reject an account request, deleting the account
#[utoipa::path(
    post,
    path = "/account-requests/{id}/reject",
    tag = "accounts",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Account rejected and removed", body = UserRemoval),
        (status = 404, description = "User not found"),
        (status = 422, description = "Account is already approved")
    )
)]
pub async fn reject_account(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserRemoval>> {
    let removal = state.services.users.reject(id).await?;
    Ok(Json(removal))
}
