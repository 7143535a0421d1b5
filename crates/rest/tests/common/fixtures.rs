//! Request bodies used across the REST tests.

use serde_json::{Value, json};

/// A valid create body for Juan Pérez with the given identification number.
pub fn juan(number: &str) -> Value {
    json!({
        "codigoTipoIdentificacion": "CC",
        "numeroIdentificacion": number,
        "primerNombre": "Juan",
        "primerApellido": "Pérez",
        "email": "juan@example.com"
    })
}

/// A valid create body with a name and email of our choosing.
pub fn patient(number: &str, first: &str, last: &str, email: &str) -> Value {
    json!({
        "codigoTipoIdentificacion": "CC",
        "numeroIdentificacion": number,
        "primerNombre": first,
        "primerApellido": last,
        "email": email
    })
}

/// The operator credentials accepted by the test configuration.
pub fn operator_login() -> Value {
    json!({ "usuario": "VERIS", "clave": "PRUEBAS123" })
}
