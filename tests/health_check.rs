//! Integration tests for the public endpoints of the server

use std::net::TcpListener;
use user_auth::configuration::{
    ApplicationSettings, DatabaseSettings, SecuritySettings, Settings, StorageBackend,
};
use user_auth::startup::{run, AppState};

fn test_settings() -> Settings {
    Settings {
        database: DatabaseSettings {
            username: "postgres".to_string(),
            password: "password".to_string(),
            port: 5432,
            host: "127.0.0.1".to_string(),
            database_name: "user_auth".to_string(),
            max_connections: 1,
        },
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_seconds: 10,
            storage: StorageBackend::Memory,
        },
        security: SecuritySettings {
            secret_key: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_ttl_minutes: 15,
            refresh_token_ttl_hours: 24,
            refresh_tokens_enabled: true,
            hash_cost: 4,
        },
    }
}

fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let state = AppState::in_memory(&test_settings()).expect("Failed to build app state");
    let server = run(listener, state).expect("Failed to create server");

    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn health_check_works() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/health_check", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn protected_routes_reject_missing_token() {
    let addr = spawn_app();
    let client = reqwest::Client::new();

    for path in ["/users", "/user", "/users/00000000-0000-0000-0000-000000000000"] {
        let response = client
            .get(&format!("{}{}", addr, path))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(401, response.status().as_u16(), "{} should require a token", path);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["code"], "MISSING_TOKEN");
    }
}

#[tokio::test]
async fn protected_routes_reject_garbage_token() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/user", addr))
        .bearer_auth("not.a.token")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(401, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn unknown_path_is_not_found_without_token() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/nope", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(404, response.status().as_u16());
}
