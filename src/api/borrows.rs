//! Borrow, issue and return endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::borrow::{
        BorrowBookRequest, BorrowDetails, BorrowQuery, BorrowRecord, IssueBookRequest,
    },
};

/// Created loan with a status message
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    pub success: bool,
    pub message: String,
    pub borrow: BorrowRecord,
}

/// Return response with the closed record
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    pub borrow: BorrowRecord,
}

/// List borrow records (books currently out by default)
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "borrows",
    params(BorrowQuery),
    responses(
        (status = 200, description = "Borrow records with borrower and title", body = Vec<BorrowDetails>)
    )
)]
pub async fn list_borrows(
    State(state): State<crate::AppState>,
    Query(query): Query<BorrowQuery>,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    let borrows = state.services.borrows.list(query.status).await?;
    Ok(Json(borrows))
}

/// Get a borrow record
#[utoipa::path(
    get,
    path = "/borrows/{id}",
    tag = "borrows",
    params(
        ("id" = Uuid, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Borrow record", body = BorrowRecord),
        (status = 404, description = "Borrow record not found")
    )
)]
pub async fn get_borrow(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BorrowRecord>> {
    let borrow = state.services.borrows.get_by_id(id).await?;
    Ok(Json(borrow))
}

/// Borrow a book (self-service, one-week loan)
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    request_body = BorrowBookRequest,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowResponse),
        (status = 404, description = "User not found"),
        (status = 422, description = "Account not approved or book not available"),
        (status = 500, description = "Failed to borrow book")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    Json(request): Json<BorrowBookRequest>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let borrow = state.services.borrows.borrow(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            success: true,
            message: "Book borrowed successfully".to_string(),
            borrow,
        }),
    ))
}

/// Issue a book to a user (staff, explicit due date)
#[utoipa::path(
    post,
    path = "/borrows/issue",
    tag = "borrows",
    request_body = IssueBookRequest,
    responses(
        (status = 201, description = "Book issued", body = BorrowResponse),
        (status = 400, description = "Invalid due date"),
        (status = 404, description = "User or book not found"),
        (status = 422, description = "User not approved or book not available")
    )
)]
pub async fn issue_book(
    State(state): State<crate::AppState>,
    Json(request): Json<IssueBookRequest>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let borrow = state.services.borrows.issue(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            success: true,
            message: "Book issued successfully".to_string(),
            borrow,
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    params(
        ("id" = Uuid, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReturnResponse>> {
    let borrow = state.services.borrows.return_book(id).await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        borrow,
    }))
}
