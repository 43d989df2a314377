//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use warden::{
    api::routes::create_router, auth::password::hash_password, types::Result, AppState,
    TursoUserStore, User, UserStore, WardenConfig,
};

pub const SECRET: &str = "integration-test-secret-at-least-32-chars";

/// User store wrapper that counts how often the admin listing is reached.
///
/// `list_users` is only called from the admin-only handler, so the counter
/// tells whether a guarded operation actually ran.
pub struct CountingStore {
    inner: TursoUserStore,
    list_calls: AtomicUsize,
}

impl CountingStore {
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for CountingStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.inner.find_by_username(username).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        self.inner.find_by_id(id).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_users().await
    }

    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        roles: &[String],
    ) -> Result<User> {
        self.inner.create_user(username, password_hash, roles).await
    }

    async fn delete_user(&self, username: &str) -> Result<bool> {
        self.inner.delete_user(username).await
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: Arc<CountingStore>,
}

/// Store with `alice` (USER, password `correctpw`) and `root` (USER+ADMIN,
/// password `rootpw`).
pub async fn create_test_store() -> Arc<CountingStore> {
    let inner = TursoUserStore::new_memory()
        .await
        .expect("Failed to open store");
    inner
        .create_user(
            "alice",
            &hash_password("correctpw").unwrap(),
            &["USER".to_string()],
        )
        .await
        .unwrap();
    inner
        .create_user(
            "root",
            &hash_password("rootpw").unwrap(),
            &["USER".to_string(), "ADMIN".to_string()],
        )
        .await
        .unwrap();

    Arc::new(CountingStore {
        inner,
        list_calls: AtomicUsize::new(0),
    })
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with(WardenConfig::default()).await
}

pub async fn create_test_app_with(config: WardenConfig) -> TestApp {
    let store = create_test_store().await;
    let state = AppState::new(config, SECRET, store.clone());
    let server =
        TestServer::new(create_router(state.clone())).expect("Failed to create test server");

    TestApp {
        server,
        state,
        store,
    }
}

/// Logs in and returns the raw `Authorization` header value.
pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/login")
        .json(&serde_json::json!({ "username": username, "password": password }))
        .await;

    response.assert_status_ok();
    response
        .header("authorization")
        .to_str()
        .expect("header should be ascii")
        .to_string()
}
