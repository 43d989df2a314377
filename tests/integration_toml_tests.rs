//! Configuration file to running router, end to end.

use axum_test::TestServer;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use warden::{
    api::routes::create_router,
    auth::password::hash_password,
    db::{seed_users, TursoUserStore, UserStore},
    utils::toml_config::ConfigError,
    AppState, WardenConfig,
};

const SECRET_ENV: &str = "WARDEN_INTEGRATION_JWT_SECRET";

fn set_secret() {
    // SAFETY: every test in this file writes the same value
    unsafe {
        std::env::set_var(SECRET_ENV, "integration-secret-that-is-at-least-32-bytes");
    }
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn create_test_config(admin_hash: &str, user_hash: &str) -> String {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = 0

[auth]
jwt_secret_env = "{SECRET_ENV}"
jwt_expiry = 600

[[users]]
username = "root"
password_hash = "{admin_hash}"
roles = ["USER", "ADMIN"]

[[users]]
username = "alice"
password_hash = "{user_hash}"
roles = ["USER"]
"#
    )
}

#[tokio::test]
async fn test_config_file_to_authorized_request() {
    set_secret();
    let file = write_config(&create_test_config(
        &hash_password("rootpw").unwrap(),
        &hash_password("correctpw").unwrap(),
    ));

    let config = WardenConfig::load(file.path()).expect("config should load");
    let secret = config.jwt_secret().unwrap();

    let store = TursoUserStore::new_local(&config.database.url).await.unwrap();
    assert_eq!(seed_users(&store, &config.users).await.unwrap(), 2);

    let users: Arc<dyn UserStore> = Arc::new(store);
    let server = TestServer::new(create_router(AppState::new(config, secret, users))).unwrap();

    let login = server
        .post("/login")
        .json(&json!({ "username": "root", "password": "rootpw" }))
        .await;
    login.assert_status_ok();
    assert_eq!(login.json::<serde_json::Value>()["expires_in"], 600);
    let bearer = login.header("authorization");

    let response = server.get("/user/all").add_header("Authorization", bearer).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Vec<serde_json::Value>>().len(), 2);
}

#[test]
fn test_plaintext_seed_password_is_rejected() {
    set_secret();
    let file = write_config(&create_test_config("rootpw", "correctpw"));

    assert!(matches!(
        WardenConfig::load(file.path()),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn test_invalid_toml_is_a_parse_error() {
    let file = write_config("[auth\njwt_expiry = ");

    assert!(matches!(
        WardenConfig::load(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}
