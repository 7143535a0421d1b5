//! Patient endpoint tests.
//!
//! Covers create, read, update and inactivate through HTTP, including the
//! validation order and the response envelope.

mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use registry_rest::ServerConfig;
use serde_json::{Value, json};

use common::fixtures;
use common::harness::RestTestHarness;

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_returns_joined_patient() {
    let harness = RestTestHarness::new().await;

    let response = harness.create(&fixtures::juan("111")).await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "Paciente creado exitosamente");
    let data = &body["data"];
    assert_eq!(data["idPaciente"], 1);
    assert_eq!(data["nombreCompleto"], "Juan Pérez");
    assert_eq!(data["estado"], "A");
    assert_eq!(data["usuarioIngreso"], "VERIS");
    assert_eq!(data["segundoNombre"], Value::Null);
    assert_eq!(data["tipoIdentificacion"]["codigoTipoIdentificacion"], "CC");
}

#[tokio::test]
async fn test_create_full_name_uses_all_parts() {
    let harness = RestTestHarness::new().await;
    let mut body = fixtures::juan("222");
    body["segundoNombre"] = json!("Carlos");
    body["segundoApellido"] = json!("García");

    let response = harness.create(&body).await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>()["data"]["nombreCompleto"],
        "Juan Carlos Pérez García"
    );
}

#[tokio::test]
async fn test_create_missing_fields() {
    let harness = RestTestHarness::new().await;
    let response = harness
        .create(&json!({"codigoTipoIdentificacion": "CC", "primerNombre": "Juan"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], false);
    assert_eq!(
        body["message"],
        "Campos requeridos: codigoTipoIdentificacion, numeroIdentificacion, primerNombre, primerApellido, email"
    );
}

#[tokio::test]
async fn test_create_invalid_email() {
    let harness = RestTestHarness::new().await;
    let mut body = fixtures::juan("111");
    body["email"] = json!("not-an-email");

    let response = harness.create(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Email inválido");
}

#[tokio::test]
async fn test_create_unknown_identification_type() {
    let harness = RestTestHarness::new().await;
    let mut body = fixtures::juan("111");
    body["codigoTipoIdentificacion"] = json!("XX");

    let response = harness.create(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "El tipo de identificación no existe o está inactivo"
    );
}

#[tokio::test]
async fn test_create_duplicate_number() {
    let harness = RestTestHarness::new().await;
    harness.create_ok(&fixtures::juan("111")).await;

    let response = harness.create(&fixtures::juan("111")).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Ya existe un paciente con este número de identificación"
    );
}

#[tokio::test]
async fn test_create_malformed_json() {
    let harness = RestTestHarness::new().await;
    let response = harness
        .server
        .post("/pacientes")
        .authorization_bearer(&harness.token)
        .text("{\"primerNombre\": ")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], false);
    assert!(body["errors"].is_array());
}

#[tokio::test]
async fn test_create_oversized_body() {
    let config = ServerConfig {
        max_body_size: 1024,
        ..ServerConfig::for_testing()
    };
    let harness = RestTestHarness::with_config(config).await;
    let mut body = fixtures::juan("111");
    body["segundoNombre"] = json!("x".repeat(4096));

    harness
        .create(&body)
        .await
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE);

    // Nothing was stored.
    let listed: Value = harness.get("/pacientes").await.json();
    assert_eq!(listed["pagination"]["totalItems"], 0);
}

// =============================================================================
// Read
// =============================================================================

#[tokio::test]
async fn test_read_patient() {
    let harness = RestTestHarness::new().await;
    let id = harness.create_ok(&fixtures::juan("111")).await;

    let response = harness.get(&format!("/pacientes/{}", id)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Paciente encontrado");
    assert_eq!(body["data"]["numeroIdentificacion"], "111");
}

#[tokio::test]
async fn test_read_unknown_and_non_numeric_ids() {
    let harness = RestTestHarness::new().await;

    for path in ["/pacientes/999", "/pacientes/abc"] {
        let response = harness.get(path).await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["status"], false);
        assert_eq!(body["message"], "Paciente no encontrado");
    }
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_changes_names_and_stamps() {
    let harness = RestTestHarness::new().await;
    let id = harness.create_ok(&fixtures::juan("111")).await;

    let response = harness
        .put(
            &format!("/pacientes/{}", id),
            &json!({"segundoApellido": "García", "email": "nuevo@example.com"}),
        )
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["message"], "Paciente actualizado exitosamente");
    assert_eq!(body["data"]["nombreCompleto"], "Juan Pérez García");
    assert_eq!(body["data"]["email"], "nuevo@example.com");
    assert_eq!(body["data"]["usuarioModificacion"], "VERIS");
    assert!(body["data"]["fechaModificacion"].is_string());
}

#[tokio::test]
async fn test_update_rejects_immutable_fields() {
    let harness = RestTestHarness::new().await;
    let id = harness.create_ok(&fixtures::juan("111")).await;

    let response = harness
        .put(
            &format!("/pacientes/{}", id),
            &json!({"numeroIdentificacion": "999", "primerNombre": "Pedro"}),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "No se pueden modificar codigoTipoIdentificacion y numeroIdentificacion"
    );

    let unchanged: Value = harness.get(&format!("/pacientes/{}", id)).await.json();
    assert_eq!(unchanged["data"]["primerNombre"], "Juan");
    assert_eq!(unchanged["data"]["fechaModificacion"], Value::Null);
}

#[tokio::test]
async fn test_update_empty_required_field_is_ignored() {
    let harness = RestTestHarness::new().await;
    let id = harness.create_ok(&fixtures::juan("111")).await;

    let response = harness
        .put(&format!("/pacientes/{}", id), &json!({"primerNombre": ""}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["primerNombre"], "Juan");
}

#[tokio::test]
async fn test_update_invalid_email() {
    let harness = RestTestHarness::new().await;
    let id = harness.create_ok(&fixtures::juan("111")).await;

    let response = harness
        .put(&format!("/pacientes/{}", id), &json!({"email": "bad"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Email inválido");
}

#[tokio::test]
async fn test_update_unknown_patient() {
    let harness = RestTestHarness::new().await;
    let response = harness
        .put("/pacientes/42", &json!({"primerNombre": "Pedro"}))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// =============================================================================
// Inactivate
// =============================================================================

#[tokio::test]
async fn test_delete_is_soft_and_repeatable() {
    let harness = RestTestHarness::new().await;
    let id = harness.create_ok(&fixtures::juan("111")).await;
    let path = format!("/pacientes/{}", id);

    for _ in 0..2 {
        let response = harness.delete(&path).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], true);
        assert_eq!(body["message"], "Paciente inactivado exitosamente");
        assert!(body.as_object().unwrap().contains_key("data"));
        assert_eq!(body["data"], Value::Null);
    }

    let read: Value = harness.get(&path).await.json();
    assert_eq!(read["data"]["estado"], "I");

    let listed: Value = harness.get("/pacientes").await.json();
    assert_eq!(listed["pagination"]["totalItems"], 0);

    harness
        .delete("/pacientes/999")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inactive_number_still_conflicts() {
    let harness = RestTestHarness::new().await;
    let id = harness.create_ok(&fixtures::juan("111")).await;
    harness.delete(&format!("/pacientes/{}", id)).await;

    harness
        .create(&fixtures::juan("111"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
// Seeding and health checks
// =============================================================================

#[tokio::test]
async fn test_seeded_sample_patients() {
    let config = ServerConfig {
        seed_sample_patients: true,
        ..ServerConfig::for_testing()
    };
    let harness = RestTestHarness::with_config(config).await;

    let body: Value = harness.get("/pacientes").await.json();
    assert_eq!(body["pagination"]["totalItems"], 2);
    assert_eq!(body["data"][0]["nombreCompleto"], "María González López");
    assert_eq!(body["data"][1]["nombreCompleto"], "Juan Carlos Pérez García");
    assert_eq!(body["data"][1]["usuarioIngreso"], "SYSTEM");

    // The sequence continues after the seeded ids.
    let id = harness.create_ok(&fixtures::juan("111")).await;
    assert_eq!(id, 3);
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let config = ServerConfig {
        enable_cors: true,
        cors_origins: "http://localhost:5173".to_string(),
        ..ServerConfig::for_testing()
    };
    let harness = RestTestHarness::with_config(config).await;

    let response = harness
        .server
        .get("/health")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("http://localhost:5173"),
        )
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.headers().get("access-control-allow-origin"),
        Some(&HeaderValue::from_static("http://localhost:5173"))
    );
}

#[tokio::test]
async fn test_health_and_readiness() {
    let harness = RestTestHarness::new().await;

    let health = harness.server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(
        health.json::<Value>(),
        json!({"status": true, "message": "API funcionando correctamente"})
    );

    let ready = harness.server.get("/_readiness").await;
    ready.assert_status_ok();
    assert_eq!(ready.json::<Value>()["status"], true);
}
