//! API handlers for the library admin REST endpoints

pub mod accounts;
pub mod books;
pub mod borrows;
pub mod health;
pub mod openapi;
pub mod stats;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Account requests
        .route(
            "/account-requests",
            get(accounts::list_account_requests).post(accounts::create_account_request),
        )
        .route("/account-requests/:id/approve", post(accounts::approve_account))
        .route("/account-requests/:id/reject", post(accounts::reject_account))
        // Users
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user).delete(users::delete_user))
        .route("/users/:id/borrows", get(users::get_user_borrows))
        // Books (catalog)
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/:id", get(books::get_book).delete(books::delete_book))
        // Borrows
        .route("/borrows", get(borrows::list_borrows).post(borrows::borrow_book))
        .route("/borrows/issue", post(borrows::issue_book))
        .route("/borrows/:id", get(borrows::get_borrow))
        .route("/borrows/:id/return", post(borrows::return_book))
        // Statistics
        .route("/stats", get(stats::get_stats))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
