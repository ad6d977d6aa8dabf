//! End-to-end tests against a running server
//!
//! Start the server with `ADMIN_USERNAME=admin ADMIN_PASSWORD=admin`, then run
//! `cargo test --test api_tests -- --ignored`.

use reqwest::{multipart, Client};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:5000";

/// Helper to get a session token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/login", BASE_URL))
        .form(&[("username", "admin"), ("password", "admin")])
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/login", BASE_URL))
        .form(&[("username", "admin"), ("password", "admin")])
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response.headers().get("set-cookie").is_some());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/login", BASE_URL))
        .form(&[("username", "admin"), ("password", "wrong")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["books"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_create_and_delete_book() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/add", BASE_URL))
        .bearer_auth(&token)
        .form(&[("title", "Integration test book"), ("year", "2024")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["id"].as_i64().expect("No id in response");

    let response = client
        .get(format!("{}/delete/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_upload_and_download() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let part = multipart::Part::bytes(b"Title,Year,Signature\nUploaded book,1999,IT-1\n".to_vec())
        .file_name("books.csv")
        .mime_str("text/csv")
        .expect("Invalid mime type");
    let form = multipart::Form::new().part("file", part);

    let response = client
        .post(format!("{}/upload", BASE_URL))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["created"], 1);

    let response = client
        .get(format!("{}/download?signature=IT-1", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"books.csv\""
    );
    let text = response.text().await.expect("Failed to read body");
    assert!(text.starts_with("ISBN,Title,Author,Publisher,Year,Signature,Description,Keywords"));
    assert!(text.contains("Uploaded book"));
}

#[tokio::test]
#[ignore]
async fn test_delete_unknown_book() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/delete/999999999", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}
