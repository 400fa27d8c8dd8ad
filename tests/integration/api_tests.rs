//! API tests against a running server backed by a real database.
//!
//! Run with: cargo test -- --ignored

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// File an account request and return its id
async fn request_account(client: &Client) -> String {
    let response = client
        .post(format!("{}/account-requests", BASE_URL))
        .json(&json!({
            "full_name": "Test Reader",
            "email": format!("reader-{}@example.org", Uuid::new_v4())
        }))
        .send()
        .await
        .expect("Failed to send account request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "PENDING");
    body["id"].as_str().expect("No user id").to_string()
}

async fn approved_user(client: &Client) -> String {
    let id = request_account(client).await;
    let response = client
        .post(format!("{}/account-requests/{}/approve", BASE_URL, id))
        .send()
        .await
        .expect("Failed to approve");
    assert!(response.status().is_success());
    id
}

async fn create_book(client: &Client, copies: i32) -> String {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Test Book",
            "author": "Test Author",
            "genre": "Testing",
            "total_copies": copies
        }))
        .send()
        .await
        .expect("Failed to create book");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["available_copies"], copies);
    body["id"].as_str().expect("No book id").to_string()
}

async fn available_copies(client: &Client, book_id: &str) -> i64 {
    let body: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to get book")
        .json()
        .await
        .expect("Failed to parse response");
    body["available_copies"].as_i64().expect("No copies")
}

async fn borrow(client: &Client, user_id: &str, book_id: &str) -> reqwest::Response {
    client
        .post(format!("{}/borrows", BASE_URL))
        .json(&json!({ "user_id": user_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to borrow")
}

#[tokio::test]
#[ignore]
async fn test_approve_twice_is_noop() {
    let client = Client::new();
    let id = request_account(&client).await;

    for _ in 0..2 {
        let response = client
            .post(format!("{}/account-requests/{}/approve", BASE_URL, id))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["status"], "APPROVED");
    }
}

#[tokio::test]
#[ignore]
async fn test_reject_pending_user() {
    let client = Client::new();
    let id = request_account(&client).await;

    let response = client
        .post(format!("{}/account-requests/{}/reject", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/users/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_pending_user_cannot_borrow() {
    let client = Client::new();
    let user = request_account(&client).await;
    let book = create_book(&client, 1).await;

    let response = borrow(&client, &user, &book).await;
    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Your account is not approved yet");

    assert_eq!(available_copies(&client, &book).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_borrow_last_copy_then_unavailable() {
    let client = Client::new();
    let user = approved_user(&client).await;
    let book = create_book(&client, 1).await;

    let response = borrow(&client, &user, &book).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["borrow"]["status"], "BORROWED");
    let due: chrono::DateTime<Utc> = body["borrow"]["due_date"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("No due date");
    let expected = Utc::now() + Duration::days(7);
    assert!((due - expected).num_minutes().abs() < 5);

    assert_eq!(available_copies(&client, &book).await, 0);

    let response = borrow(&client, &user, &book).await;
    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book not available");
    assert_eq!(available_copies(&client, &book).await, 0);
}

#[tokio::test]
#[ignore]
async fn test_issue_and_return_restores_inventory() {
    let client = Client::new();
    let user = approved_user(&client).await;
    let book = create_book(&client, 3).await;
    let due = (Utc::now() + Duration::days(14)).format("%Y-%m-%d").to_string();

    let response = client
        .post(format!("{}/borrows/issue", BASE_URL))
        .json(&json!({ "user_id": user, "book_id": book, "due_date": due }))
        .send()
        .await
        .expect("Failed to issue");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let borrow_id = body["borrow"]["id"].as_str().expect("No borrow id").to_string();
    assert_eq!(available_copies(&client, &book).await, 2);

    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .send()
        .await
        .expect("Failed to return");
    assert_eq!(response.status(), 200);
    assert_eq!(available_copies(&client, &book).await, 3);

    // Second return is refused and leaves inventory alone
    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .send()
        .await
        .expect("Failed to return");
    assert_eq!(response.status(), 409);
    assert_eq!(available_copies(&client, &book).await, 3);
}

#[tokio::test]
#[ignore]
async fn test_return_unknown_borrow() {
    let client = Client::new();

    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_delete_user_restores_borrowed_copies() {
    let client = Client::new();
    let user = approved_user(&client).await;
    let book = create_book(&client, 2).await;

    assert_eq!(borrow(&client, &user, &book).await.status(), 201);
    assert_eq!(available_copies(&client, &book).await, 1);

    let response = client
        .delete(format!("{}/users/{}", BASE_URL, user))
        .send()
        .await
        .expect("Failed to delete user");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["restored_copies"], 1);

    assert_eq!(available_copies(&client, &book).await, 2);
}

#[tokio::test]
#[ignore]
async fn test_get_stats() {
    let client = Client::new();

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total_users"].is_number());
    assert!(body["total_books"].is_number());
    assert!(body["issued_books"].is_number());
    assert!(body["available_copies"].is_number());
}
