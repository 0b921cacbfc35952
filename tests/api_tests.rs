//! API integration tests
//!
//! These run against a live server with a fresh database (the default admin
//! account must still exist).

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api";

/// Helper to get an admin token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Register a throwaway user and promote it to the given role, returning
/// (user_id, token)
async fn create_user_with_role(client: &Client, admin_token: &str, name: &str, role: &str) -> (i64, String) {
    let response = client
        .post(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({
            "username": name,
            "email": format!("{}@example.org", name),
            "password": "secret99",
            "role": role
        }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let user_id = body["id"].as_i64().expect("No user ID");

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": name, "password": "secret99" }))
        .send()
        .await
        .expect("Failed to login as new user");
    let body: Value = response.json().await.expect("Failed to parse login response");
    let token = body["token"].as_str().expect("No token").to_string();

    (user_id, token)
}

/// Create a category and an item inside it, returning (category_id, item_id)
async fn create_test_item(client: &Client, token: &str, name: &str, extra: Value) -> (i64, i64) {
    let response = client
        .post(format!("{}/categories", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": format!("cat-{}", name) }))
        .send()
        .await
        .expect("Failed to create category");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let category_id = body["id"].as_i64().expect("No category ID");

    let mut item = json!({
        "name": name,
        "category_id": category_id
    });
    if let Some(obj) = extra.as_object() {
        for (k, v) in obj {
            item[k] = v.clone();
        }
    }

    let response = client
        .post(format!("{}/inventory", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&item)
        .send()
        .await
        .expect("Failed to create item");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let item_id = body["id"].as_i64().expect("No item ID");

    (category_id, item_id)
}

async fn delete_item_and_category(client: &Client, token: &str, category_id: i64, item_id: i64) {
    let _ = client
        .delete(format!("{}/inventory/{}", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
    let _ = client
        .delete(format!("{}/categories/{}", BASE_URL, category_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
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
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_register_starts_pending() {
    let client = Client::new();
    let admin_token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": "pending_probe",
            "email": "pending_probe@example.org",
            "password": "secret99"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["role"], "pending");
    assert!(body["password"].is_null());

    let user_id = body["id"].as_i64().expect("No user ID");
    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/inventory", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_non_admin_cannot_create_category() {
    let client = Client::new();
    let admin_token = get_auth_token(&client).await;
    let (user_id, user_token) =
        create_user_with_role(&client, &admin_token, "member_cat", "user").await;

    let response = client
        .post(format!("{}/categories", BASE_URL))
        .header("Authorization", format!("Bearer {}", user_token))
        .json(&json!({ "name": "Forbidden" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_pending_user_cannot_borrow() {
    let client = Client::new();
    let admin_token = get_auth_token(&client).await;
    let (category_id, item_id) = create_test_item(&client, &admin_token, "heat-gun", json!({})).await;
    let (user_id, pending_token) =
        create_user_with_role(&client, &admin_token, "member_pending", "pending").await;

    let response = client
        .post(format!("{}/inventory/{}/borrow", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", pending_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // The item must be untouched
    let response = client
        .get(format!("{}/inventory/{}", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to fetch item");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["is_available"], true);

    delete_item_and_category(&client, &admin_token, category_id, item_id).await;
    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_cycle() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (category_id, item_id) = create_test_item(&client, &token, "cordless-drill", json!({})).await;

    // Borrow
    let response = client
        .post(format!("{}/inventory/{}/borrow", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to borrow");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert_eq!(body["item"]["is_available"], false);
    assert!(body["item"]["current_borrower_id"].is_number());

    // Second borrow must be refused
    let response = client
        .post(format!("{}/inventory/{}/borrow", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Return
    let response = client
        .post(format!("{}/inventory/{}/return", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to return");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["item"]["is_available"], true);
    assert!(body["item"]["current_borrower_id"].is_null());

    // The ledger now holds one closed row
    let response = client
        .get(format!("{}/inventory/{}/history", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch history");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let history = body.as_array().expect("History is not an array");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["is_returned"], true);

    delete_item_and_category(&client, &token, category_id, item_id).await;
}

#[tokio::test]
#[ignore]
async fn test_return_requires_borrower_or_admin() {
    let client = Client::new();
    let admin_token = get_auth_token(&client).await;
    let (category_id, item_id) = create_test_item(&client, &admin_token, "angle-grinder", json!({})).await;
    let (borrower_id, borrower_token) =
        create_user_with_role(&client, &admin_token, "member_borrow", "user").await;
    let (other_id, other_token) =
        create_user_with_role(&client, &admin_token, "member_other", "user").await;

    let response = client
        .post(format!("{}/inventory/{}/borrow", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", borrower_token))
        .send()
        .await
        .expect("Failed to borrow");
    assert!(response.status().is_success());

    // A third party cannot return it
    let response = client
        .post(format!("{}/inventory/{}/return", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", other_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // An admin can
    let response = client
        .post(format!("{}/inventory/{}/return", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to return");
    assert!(response.status().is_success());

    delete_item_and_category(&client, &admin_token, category_id, item_id).await;
    for user_id in [borrower_id, other_id] {
        let _ = client
            .delete(format!("{}/users/{}", BASE_URL, user_id))
            .header("Authorization", format!("Bearer {}", admin_token))
            .send()
            .await;
    }
}

#[tokio::test]
#[ignore]
async fn test_purchase_decrements_stock() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (category_id, item_id) = create_test_item(
        &client,
        &token,
        "sanding-discs",
        json!({
            "is_purchasable": true,
            "price_per_unit": "2.50",
            "stock_quantity": 10
        }),
    )
    .await;

    let response = client
        .post(format!("{}/purchases", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "item_id": item_id, "quantity": 4 }))
        .send()
        .await
        .expect("Failed to purchase");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert_eq!(body["purchase"]["quantity"], 4);
    assert_eq!(body["purchase"]["total_price"], "10.00");

    let response = client
        .get(format!("{}/inventory/{}", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch item");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["stock_quantity"], 6);

    // Asking for more than the remaining stock is refused
    let response = client
        .post(format!("{}/purchases", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "item_id": item_id, "quantity": 7 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    delete_item_and_category(&client, &token, category_id, item_id).await;
}

#[tokio::test]
#[ignore]
async fn test_purchase_rejected_for_non_purchasable_item() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (category_id, item_id) = create_test_item(&client, &token, "table-saw", json!({})).await;

    let response = client
        .post(format!("{}/purchases", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "item_id": item_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    delete_item_and_category(&client, &token, category_id, item_id).await;
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_only_one_wins() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (category_id, item_id) = create_test_item(&client, &token, "laser-cutter", json!({})).await;

    let mut handles = Vec::new();
    for _ in 0..5 {
        let client = client.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            client
                .post(format!("{}/inventory/{}/borrow", BASE_URL, item_id))
                .header("Authorization", format!("Bearer {}", token))
                .send()
                .await
                .expect("Failed to send request")
                .status()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.expect("Task panicked").is_success() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);

    let _ = client
        .post(format!("{}/inventory/{}/return", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
    delete_item_and_category(&client, &token, category_id, item_id).await;
}

#[tokio::test]
#[ignore]
async fn test_concurrent_purchases_over_stock_only_one_wins() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (category_id, item_id) = create_test_item(
        &client,
        &token,
        "wood-glue",
        json!({
            "is_purchasable": true,
            "price_per_unit": "5.00",
            "stock_quantity": 5
        }),
    )
    .await;

    // Two purchases of 3 against stock 5: the row lock serializes them, so
    // exactly one can succeed
    let mut handles = Vec::new();
    for _ in 0..2 {
        let client = client.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            client
                .post(format!("{}/purchases", BASE_URL))
                .header("Authorization", format!("Bearer {}", token))
                .json(&json!({ "item_id": item_id, "quantity": 3 }))
                .send()
                .await
                .expect("Failed to send request")
                .status()
        }));
    }

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.expect("Task panicked"));
    }
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(statuses[0], 201);
    assert_eq!(statuses[1], 409);

    let response = client
        .get(format!("{}/inventory/{}", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch item");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["stock_quantity"], 2);

    delete_item_and_category(&client, &token, category_id, item_id).await;
}

#[tokio::test]
#[ignore]
async fn test_category_in_use_cannot_be_deleted() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (category_id, item_id) = create_test_item(&client, &token, "clamps", json!({})).await;

    let response = client
        .delete(format!("{}/categories/{}", BASE_URL, category_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    delete_item_and_category(&client, &token, category_id, item_id).await;
}

#[tokio::test]
#[ignore]
async fn test_last_admin_cannot_be_demoted() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch current user");
    let body: Value = response.json().await.expect("Failed to parse response");
    let admin_id = body["id"].as_i64().expect("No user ID");

    // Only valid while the test database has a single admin
    let response = client
        .put(format!("{}/users/{}/role", BASE_URL, admin_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "role": "user" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_last_admin_cannot_be_deleted() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch current user");
    let body: Value = response.json().await.expect("Failed to parse response");
    let admin_id = body["id"].as_i64().expect("No user ID");

    // Only valid while the test database has a single admin
    let response = client
        .delete(format!("{}/users/{}", BASE_URL, admin_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // The account must still exist
    let response = client
        .get(format!("{}/users/{}", BASE_URL, admin_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch user");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_get_stats() {
    let client = Client::new();
    let admin_token = get_auth_token(&client).await;
    // Stats are readable by any authenticated account, not just admins
    let (user_id, user_token) =
        create_user_with_role(&client, &admin_token, "member_stats", "user").await;

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", user_token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total_items"].is_number());
    assert!(body["total_users"].is_number());
    assert_eq!(
        body["available_items"].as_i64().unwrap() + body["borrowed_items"].as_i64().unwrap(),
        body["total_items"].as_i64().unwrap()
    );

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_notification_templates() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/notification-templates", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().expect("Not an array").len(), 2);

    let response = client
        .put(format!("{}/notification-templates/borrow", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "title": "Enjoy your tool" }))
        .send()
        .await
        .expect("Failed to update template");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["title"], "Enjoy your tool");
    assert_eq!(body["template_type"], "borrow");
}
