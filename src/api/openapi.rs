//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{accounts, books, borrows, health, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Admin API",
        version = "1.0.0",
        description = "Account review, catalog and borrow management REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Account requests
        accounts::list_account_requests,
        accounts::create_account_request,
        accounts::approve_account,
        accounts::reject_account,
        // Users
        users::list_users,
        users::get_user,
        users::delete_user,
        users::get_user_borrows,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::delete_book,
        // Borrows
        borrows::list_borrows,
        borrows::get_borrow,
        borrows::borrow_book,
        borrows::issue_book,
        borrows::return_book,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::UserStatus,
            crate::models::user::UserRole,
            crate::models::user::CreateAccountRequest,
            crate::models::user::UserRemoval,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            // Borrows
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::BorrowDetails,
            crate::models::borrow::BorrowStatus,
            crate::models::borrow::BorrowBookRequest,
            crate::models::borrow::IssueBookRequest,
            borrows::BorrowResponse,
            borrows::ReturnResponse,
            // Stats
            crate::models::stats::DashboardStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Signup review queue"),
        (name = "users", description = "User management"),
        (name = "books", description = "Catalog management"),
        (name = "borrows", description = "Issue, borrow and return"),
        (name = "stats", description = "Dashboard statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
