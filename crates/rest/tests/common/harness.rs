//! REST API test harness.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use registry_persistence::backends::sqlite::SqliteBackend;
use registry_persistence::core::Backend;
use registry_persistence::startup::seed;
use registry_rest::{ServerConfig, create_app_with_shared};
use serde_json::Value;

use super::fixtures;

/// A test server over a seeded backend, plus a valid token.
pub struct RestTestHarness {
    /// The test server instance.
    pub server: TestServer,

    /// The storage backend.
    pub backend: Arc<SqliteBackend>,

    /// A token obtained through the login endpoint.
    pub token: String,
}

impl RestTestHarness {
    /// Builds a harness with [`ServerConfig::for_testing`].
    pub async fn new() -> Self {
        Self::with_config(ServerConfig::for_testing()).await
    }

    /// Builds a harness over an in-memory backend with a custom configuration.
    pub async fn with_config(config: ServerConfig) -> Self {
        let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
        Self::with_backend(backend, config).await
    }

    /// Builds a harness over an existing backend.
    pub async fn with_backend(backend: SqliteBackend, config: ServerConfig) -> Self {
        backend
            .initialize()
            .await
            .expect("Failed to initialize backend");
        let backend = Arc::new(backend);
        seed(backend.as_ref(), config.seed_sample_patients)
            .await
            .expect("Failed to seed");

        let app = create_app_with_shared(Arc::clone(&backend), config);
        let server = TestServer::new(app).expect("Failed to create test server");

        let login = server
            .post("/autenticacion")
            .json(&fixtures::operator_login())
            .await;
        login.assert_status_ok();
        let token = login.json::<Value>()["data"]["token"]
            .as_str()
            .expect("token in login response")
            .to_string();

        Self {
            server,
            backend,
            token,
        }
    }

    /// POST /pacientes with the harness token.
    pub async fn create(&self, body: &Value) -> TestResponse {
        self.server
            .post("/pacientes")
            .authorization_bearer(&self.token)
            .json(body)
            .await
    }

    /// Creates a patient and returns its id.
    pub async fn create_ok(&self, body: &Value) -> i64 {
        let response = self.create(body).await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["data"]["idPaciente"]
            .as_i64()
            .expect("idPaciente in create response")
    }

    /// GET with the harness token.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.server
            .get(path)
            .authorization_bearer(&self.token)
            .await
    }

    /// PUT with the harness token.
    pub async fn put(&self, path: &str, body: &Value) -> TestResponse {
        self.server
            .put(path)
            .authorization_bearer(&self.token)
            .json(body)
            .await
    }

    /// DELETE with the harness token.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.server
            .delete(path)
            .authorization_bearer(&self.token)
            .await
    }
}
