//! Input checks shared by create and update.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::types::NewPatient;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Wire names of the fields a new patient must carry, in report order.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "codigoTipoIdentificacion",
    "numeroIdentificacion",
    "primerNombre",
    "primerApellido",
    "email",
];

/// Returns true if `email` looks like `local@domain.tld`.
///
/// # Examples
///
/// ```
/// use registry_persistence::registry::is_valid_email;
///
/// assert!(is_valid_email("juan.perez@example.com"));
/// assert!(!is_valid_email("juan@example"));
/// assert!(!is_valid_email("juan perez@example.com"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Checks an email address.
pub fn check_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail {
            email: email.to_string(),
        })
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// Reports every required field that is absent or empty.
pub fn check_required(input: &NewPatient) -> Result<(), ValidationError> {
    let values = [
        &input.identification_type_code,
        &input.identification_number,
        &input.first_given_name,
        &input.first_family_name,
        &input.email,
    ];

    let fields: Vec<String> = REQUIRED_FIELDS
        .iter()
        .zip(values)
        .filter(|(_, value)| is_blank(value))
        .map(|(name, _)| (*name).to_string())
        .collect();

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingRequiredFields { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> NewPatient {
        NewPatient {
            identification_type_code: Some("CC".to_string()),
            identification_number: Some("111".to_string()),
            first_given_name: Some("Juan".to_string()),
            second_given_name: None,
            first_family_name: Some("Pérez".to_string()),
            second_family_name: None,
            email: Some("juan@example.com".to_string()),
        }
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("a@b"));
        assert!(check_email("bad").is_err());
    }

    #[test]
    fn test_complete_input_passes() {
        assert!(check_required(&complete()).is_ok());
    }

    #[test]
    fn test_missing_and_empty_fields_are_reported() {
        let input = NewPatient {
            first_given_name: Some(String::new()),
            email: None,
            ..complete()
        };
        assert_eq!(
            check_required(&input),
            Err(ValidationError::MissingRequiredFields {
                fields: vec!["primerNombre".to_string(), "email".to_string()],
            })
        );
    }
}
