//! API integration tests.
//!
//! Run against a live server seeded with an admin/admin account:
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique suffix so tests can run repeatedly against the same database
fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}", nanos)
}

/// Helper to get an authenticated admin token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn create_catalog_entry(client: &Client, token: &str, path: &str, name: &str) -> i64 {
    let response = client
        .post(format!("{}/{}", BASE_URL, path))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to create catalog entry");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No catalog id")
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
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
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
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/equipment", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

/// Every identity gets exactly one profile, created at identity creation
#[tokio::test]
#[ignore]
async fn test_profile_created_with_user() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let username = format!("user{}", unique_suffix());

    let response = client
        .post(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "username": username,
            "password": "testpass",
            "profile": { "area": "IT" }
        }))
        .send()
        .await
        .expect("Failed to create user");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let user_id = body["id"].as_i64().expect("No user ID");

    // The profile exists immediately, carrying the submitted fields
    assert!(body["profile"].is_object());
    assert_eq!(body["profile"]["user_id"].as_i64(), Some(user_id));
    assert_eq!(body["profile"]["area"], "IT");

    // And it comes back on reads
    let response = client
        .get(format!("{}/users/{}", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch user");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["profile"]["user_id"].as_i64(), Some(user_id));

    // Cleanup
    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

/// Each successful equipment create/update/delete appends exactly one audit
/// record with matching action and entity labels
#[tokio::test]
#[ignore]
async fn test_equipment_mutations_write_audit() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let suffix = unique_suffix();
    let serial = format!("AUD-{}", suffix);

    let type_id = create_catalog_entry(&client, &token, "equipment-types", &format!("Laptop {}", suffix)).await;
    let status_id = create_catalog_entry(&client, &token, "statuses", &format!("In repair {}", suffix)).await;

    // Create
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "serial_number": serial,
            "brand": "HP",
            "model": "EliteBook",
            "type_id": type_id,
            "status_id": status_id
        }))
        .send()
        .await
        .expect("Failed to create equipment");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let equipment_id = body["id"].as_i64().expect("No equipment ID");

    // Update
    let response = client
        .put(format!("{}/equipment/{}", BASE_URL, equipment_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "model": "EliteBook 840" }))
        .send()
        .await
        .expect("Failed to update equipment");
    assert_eq!(response.status(), 200);

    // Delete
    let response = client
        .delete(format!("{}/equipment/{}", BASE_URL, equipment_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to delete equipment");
    assert_eq!(response.status(), 204);

    // One audit record per mutation, newest first
    let response = client
        .get(format!("{}/audit", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch audit trail");
    assert!(response.status().is_success());
    let records: Vec<Value> = response.json().await.expect("Failed to parse response");

    let mine: Vec<&Value> = records
        .iter()
        .filter(|r| r["entity"] == "equipment" && r["detail"].as_str().unwrap_or("").contains(&serial))
        .collect();
    let actions: Vec<&str> = mine.iter().map(|r| r["action"].as_str().unwrap()).collect();

    assert_eq!(actions.iter().filter(|a| **a == "create").count(), 1);
    assert_eq!(actions.iter().filter(|a| **a == "update").count(), 1);
    assert_eq!(actions.iter().filter(|a| **a == "delete").count(), 1);
}

/// Bulk-creating 5 records from base serial "X" yields 5 distinct serials,
/// all prefixed "X-"
#[tokio::test]
#[ignore]
async fn test_bulk_creation_unique_serials() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let suffix = unique_suffix();
    let supplier_id = create_catalog_entry(&client, &token, "suppliers", &format!("Acme {}", suffix)).await;
    let base = format!("X{}", suffix);

    let form = reqwest::multipart::Form::new()
        .text("count", "5")
        .text("base_serial", base.clone())
        .text("brand", "Lenovo")
        .text("model", "ThinkPad")
        .text("supplier_id", supplier_id.to_string());

    let response = client
        .post(format!("{}/equipment/bulk", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send bulk request");

    assert_eq!(response.status(), 201);
    let created: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert_eq!(created.len(), 5);

    let mut serials: Vec<String> = created
        .iter()
        .map(|e| e["serial_number"].as_str().unwrap().to_string())
        .collect();
    for serial in &serials {
        assert!(serial.starts_with(&format!("{}-", base)));
    }
    serials.sort();
    serials.dedup();
    assert_eq!(serials.len(), 5);
}

/// Bulk creation rejects a non-positive count and a missing supplier before
/// creating anything
#[tokio::test]
#[ignore]
async fn test_bulk_creation_rejections() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let suffix = unique_suffix();
    let supplier_id = create_catalog_entry(&client, &token, "suppliers", &format!("Rej {}", suffix)).await;
    let base = format!("REJ{}", suffix);

    // count = 0
    let form = reqwest::multipart::Form::new()
        .text("count", "0")
        .text("base_serial", base.clone())
        .text("brand", "Dell")
        .text("supplier_id", supplier_id.to_string());
    let response = client
        .post(format!("{}/equipment/bulk", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send bulk request");
    assert_eq!(response.status(), 400);

    // missing supplier
    let form = reqwest::multipart::Form::new()
        .text("count", "3")
        .text("base_serial", base.clone())
        .text("brand", "Dell");
    let response = client
        .post(format!("{}/equipment/bulk", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send bulk request");
    assert_eq!(response.status(), 400);

    // Neither request created anything
    let response = client
        .get(format!("{}/equipment?search={}&all=true", BASE_URL, base))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to list equipment");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
}

/// Structured filters AND-compose; the free-text term is OR'd across joined
/// fields (a branch-name-only match still returns the row) and AND'd with
/// the structured filters
#[tokio::test]
#[ignore]
async fn test_equipment_filter_composition() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let suffix = unique_suffix();

    let type_a = create_catalog_entry(&client, &token, "equipment-types", &format!("Desktop {}", suffix)).await;
    let type_b = create_catalog_entry(&client, &token, "equipment-types", &format!("Printer {}", suffix)).await;
    let status_id = create_catalog_entry(&client, &token, "statuses", &format!("Stored {}", suffix)).await;
    let branch_name = format!("Central Warehouse {}", suffix);

    let serial_a = format!("FLT-A-{}", suffix);
    let serial_b = format!("FLT-B-{}", suffix);

    // Equipment A: type_a, purchased 2020-01-01, branch auto-created by name
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "serial_number": serial_a,
            "brand": "HP",
            "model": "ProDesk",
            "purchase_date": "2020-01-01",
            "type_id": type_a,
            "status_id": status_id,
            "branch_name": branch_name
        }))
        .send()
        .await
        .expect("Failed to create equipment A");
    assert_eq!(response.status(), 201);

    // Equipment B: type_b, purchased 2021-01-01
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "serial_number": serial_b,
            "brand": "Epson",
            "model": "WorkForce",
            "purchase_date": "2021-01-01",
            "type_id": type_b,
            "status_id": status_id
        }))
        .send()
        .await
        .expect("Failed to create equipment B");
    assert_eq!(response.status(), 201);

    let list = |query: String| {
        let client = client.clone();
        let token = token.clone();
        async move {
            let response = client
                .get(format!("{}/equipment?{}&all=true", BASE_URL, query))
                .header("Authorization", format!("Bearer {}", token))
                .send()
                .await
                .expect("Failed to list equipment");
            let body: Value = response.json().await.expect("Failed to parse response");
            body["items"].as_array().unwrap().clone()
        }
    };

    // Filter by type: only A
    let items = list(format!("type_id={}", type_a)).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["serial_number"], serial_a.as_str());

    // Purchase date lower bound: only B (restrict to this test's serials)
    let items = list(format!("purchase_date_min=2020-06-01&search=FLT")).await;
    let serials: Vec<&str> = items.iter().map(|i| i["serial_number"].as_str().unwrap()).collect();
    assert!(serials.contains(&serial_b.as_str()));
    assert!(!serials.contains(&serial_a.as_str()));

    // Unmatched free text AND'd with a matching type filter yields nothing
    let items = list(format!("type_id={}&search=no-such-term-{}", type_a, suffix)).await;
    assert_eq!(items.len(), 0);

    // A term matching only the branch name still returns the row
    let items = list(format!("search={}", branch_name.replace(' ', "+"))).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["serial_number"], serial_a.as_str());
}

/// Supplier grouping buckets unassigned equipment under the explicit label
#[tokio::test]
#[ignore]
async fn test_dashboard_supplier_grouping() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let suffix = unique_suffix();
    let supplier_name = format!("S1 {}", suffix);
    let supplier_id = create_catalog_entry(&client, &token, "suppliers", &supplier_name).await;
    let type_id = create_catalog_entry(&client, &token, "equipment-types", &format!("Server {}", suffix)).await;
    let status_id = create_catalog_entry(&client, &token, "statuses", &format!("Racked {}", suffix)).await;

    for (i, with_supplier) in [(1, true), (2, true), (3, false)] {
        let mut payload = json!({
            "serial_number": format!("DSH-{}-{}", i, suffix),
            "brand": "Dell",
            "model": "PowerEdge",
            "type_id": type_id,
            "status_id": status_id
        });
        if with_supplier {
            payload["supplier_id"] = json!(supplier_id);
        }
        let response = client
            .post(format!("{}/equipment", BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .json(&payload)
            .send()
            .await
            .expect("Failed to create equipment");
        assert_eq!(response.status(), 201);
    }

    let response = client
        .get(format!("{}/dashboard", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch dashboard");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");

    let by_supplier = body["by_supplier"].as_array().unwrap();
    let entry = by_supplier
        .iter()
        .find(|e| e["label"] == supplier_name.as_str())
        .expect("Supplier bucket missing");
    assert_eq!(entry["value"].as_i64(), Some(2));

    let unassigned = by_supplier
        .iter()
        .find(|e| e["label"] == "Sin Proveedor Asignado")
        .expect("Unassigned supplier bucket missing");
    assert!(unassigned["value"].as_i64().unwrap() >= 1);
}

/// Completing a task stamps label and completion time; completing it again
/// succeeds and re-stamps
#[tokio::test]
#[ignore]
async fn test_task_completion_restamps() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let suffix = unique_suffix();

    let response = client
        .post(format!("{}/tasks", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "title": format!("Replace toner {}", suffix) }))
        .send()
        .await
        .expect("Failed to create task");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let task_id = body["id"].as_i64().expect("No task ID");
    assert_eq!(body["label"], "pending");
    assert!(body["completed_at"].is_null());

    let response = client
        .patch(format!("{}/tasks/{}/complete", BASE_URL, task_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to complete task");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["label"], "done");
    let first_stamp = body["completed_at"].as_str().expect("No completion time").to_string();

    // Completing again is not an error and moves the stamp forward
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let response = client
        .patch(format!("{}/tasks/{}/complete", BASE_URL, task_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to re-complete task");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["label"], "done");
    let second_stamp = body["completed_at"].as_str().expect("No completion time");
    assert!(second_stamp >= first_stamp.as_str());
}

/// A notification with no recipient is visible in every user's feed
#[tokio::test]
#[ignore]
async fn test_broadcast_notification_visibility() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let suffix = unique_suffix();

    // Bulk creation broadcasts a notification
    let supplier_id = create_catalog_entry(&client, &token, "suppliers", &format!("Bcast {}", suffix)).await;
    let brand = format!("Brand{}", suffix);
    let form = reqwest::multipart::Form::new()
        .text("count", "1")
        .text("base_serial", format!("BC{}", suffix))
        .text("brand", brand.clone())
        .text("model", "X1")
        .text("supplier_id", supplier_id.to_string());
    let response = client
        .post(format!("{}/equipment/bulk", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send bulk request");
    assert_eq!(response.status(), 201);

    // A freshly created, unrelated user sees the broadcast in their feed
    let username = format!("viewer{}", suffix);
    let response = client
        .post(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "username": username, "password": "viewerpass" }))
        .send()
        .await
        .expect("Failed to create viewer");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": "viewerpass" }))
        .send()
        .await
        .expect("Failed to log in as viewer");
    let body: Value = response.json().await.expect("Failed to parse response");
    let viewer_token = body["token"].as_str().expect("No viewer token");

    let response = client
        .get(format!("{}/notifications", BASE_URL))
        .header("Authorization", format!("Bearer {}", viewer_token))
        .send()
        .await
        .expect("Failed to fetch feed");
    assert!(response.status().is_success());
    let feed: Vec<Value> = response.json().await.expect("Failed to parse response");

    let broadcast = feed
        .iter()
        .find(|n| n["body"].as_str().unwrap_or("").contains(&brand))
        .expect("Broadcast notification missing from viewer feed");
    assert!(broadcast["user_id"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_audit_requires_admin() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let suffix = unique_suffix();

    let username = format!("plain{}", suffix);
    let response = client
        .post(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "username": username, "password": "plainpass" }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": "plainpass" }))
        .send()
        .await
        .expect("Failed to log in");
    let body: Value = response.json().await.expect("Failed to parse response");
    let plain_token = body["token"].as_str().expect("No token");

    let response = client
        .get(format!("{}/audit", BASE_URL))
        .header("Authorization", format!("Bearer {}", plain_token))
        .send()
        .await
        .expect("Failed to request audit trail");
    assert_eq!(response.status(), 403);
}
