use axum::http::StatusCode;
use serde_json::{Value, json};

mod common;

#[tokio::test]
async fn test_livez_is_always_ok() {
    let app = common::TestApp::spawn_with_config(common::get_test_config()).await;

    let resp = app.client.get(format!("{}/livez", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readyz_ok_when_relay_configured() {
    let app = common::TestApp::spawn_with_config(common::get_test_config()).await;

    let resp = app.client.get(format!("{}/readyz", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["relay"], json!("ok"));
}

#[tokio::test]
async fn test_readyz_fails_without_recipient() {
    let mut config = common::get_test_config();
    config.delivery.recipient = None;
    let app = common::TestApp::spawn_with_config(config).await;

    let resp = app.client.get(format!("{}/readyz", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], json!("error"));
    assert_eq!(body["relay"], json!("unconfigured"));
}
