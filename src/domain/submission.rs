use serde::Serialize;
use serde_json::Value;

pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 2000;

/// A contact message that has passed sanitization and validation.
///
/// Only [`validate`] constructs this, so holding one implies every field rule
/// held at construction time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A validation failure attributed to one named input field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// Trims leading and trailing whitespace and collapses internal runs to a
/// single space. Idempotent.
#[must_use]
pub fn sanitize_input(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Validates a raw JSON body into a [`ContactSubmission`].
///
/// Violations are collected per field rather than short-circuiting at the
/// first failure, so the caller can surface every problem at once. Fields
/// that are missing or not strings are treated as empty.
pub fn validate(raw: &Value) -> Result<ContactSubmission, Vec<FieldError>> {
    let Some(fields) = raw.as_object() else {
        return Err(vec![FieldError::new("body", "Invalid request body")]);
    };

    let name = sanitize_input(fields.get("name").and_then(Value::as_str).unwrap_or_default());
    let email = sanitize_input(fields.get("email").and_then(Value::as_str).unwrap_or_default());
    let message = sanitize_input(fields.get("message").and_then(Value::as_str).unwrap_or_default());

    let mut errors = Vec::new();

    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if name.chars().count() > NAME_MAX_CHARS {
        errors.push(FieldError::new("name", format!("Name must be {NAME_MAX_CHARS} characters or less")));
    }

    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "Please enter a valid email address"));
    } else if email.chars().count() > EMAIL_MAX_CHARS {
        errors.push(FieldError::new("email", format!("Email must be {EMAIL_MAX_CHARS} characters or less")));
    }

    if message.is_empty() {
        errors.push(FieldError::new("message", "Message is required"));
    } else if message.chars().count() < MESSAGE_MIN_CHARS {
        errors.push(FieldError::new(
            "message",
            format!("Message must be at least {MESSAGE_MIN_CHARS} characters"),
        ));
    } else if message.chars().count() > MESSAGE_MAX_CHARS {
        errors.push(FieldError::new(
            "message",
            format!("Message must be {MESSAGE_MAX_CHARS} characters or less"),
        ));
    }

    if errors.is_empty() { Ok(ContactSubmission { name, email, message }) } else { Err(errors) }
}

/// Address syntax check: non-empty local part, a single `@`, and a domain
/// with an interior dot. No whitespace or extra `@` anywhere.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let clean = |s: &str| !s.is_empty() && s.chars().all(|c| !c.is_whitespace() && c != '@');
    if !clean(local) || !clean(domain) {
        return false;
    }

    let chars: Vec<char> = domain.chars().collect();
    chars.len() >= 3 && chars[1..chars.len() - 1].contains(&'.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "message": "I would like to discuss a new analytical engine.",
        })
    }

    #[test]
    fn test_valid_submission_passes() {
        let submission = validate(&valid_body()).expect("should validate");
        assert_eq!(submission.name, "Ada Lovelace");
        assert_eq!(submission.email, "ada@example.com");
    }

    #[test]
    fn test_sanitize_trims_and_collapses() {
        assert_eq!(sanitize_input("  Ada   Lovelace \t"), "Ada Lovelace");
        assert_eq!(sanitize_input("one\ntwo\r\nthree"), "one two three");
        assert_eq!(sanitize_input("   "), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for input in ["  a  b ", "already clean", "\t\n", "x"] {
            let once = sanitize_input(input);
            assert_eq!(sanitize_input(&once), once);
        }
    }

    #[test]
    fn test_non_object_body_yields_single_body_error() {
        for raw in [json!("hello"), json!(42), json!(null), json!([1, 2])] {
            let errors = validate(&raw).expect_err("should fail");
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "body");
        }
    }

    #[test]
    fn test_missing_fields_report_per_field() {
        let errors = validate(&json!({})).expect_err("should fail");
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "message"]);
    }

    #[test]
    fn test_non_string_fields_coerce_to_empty() {
        let errors = validate(&json!({"name": 7, "email": true, "message": null})).expect_err("should fail");
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "message"]);
    }

    #[test]
    fn test_errors_are_field_independent() {
        // The errors for a fully broken body equal the union of the errors
        // each field produces on its own.
        let mut body = valid_body();
        body["name"] = json!("");
        let name_only = validate(&body).expect_err("name should fail");

        let mut body = valid_body();
        body["message"] = json!("short");
        let message_only = validate(&body).expect_err("message should fail");

        let combined = validate(&json!({
            "name": "",
            "email": "ada@example.com",
            "message": "short",
        }))
        .expect_err("both should fail");

        let mut expected = name_only;
        expected.extend(message_only);
        assert_eq!(combined, expected);
    }

    #[test]
    fn test_name_boundaries() {
        let mut body = valid_body();
        body["name"] = json!("n".repeat(NAME_MAX_CHARS));
        assert!(validate(&body).is_ok());

        body["name"] = json!("n".repeat(NAME_MAX_CHARS + 1));
        let errors = validate(&body).expect_err("should fail");
        assert_eq!(errors[0].message, "Name must be 100 characters or less");
    }

    #[test]
    fn test_message_boundaries() {
        let mut body = valid_body();
        body["message"] = json!("m".repeat(MESSAGE_MIN_CHARS));
        assert!(validate(&body).is_ok());

        body["message"] = json!("m".repeat(MESSAGE_MIN_CHARS - 1));
        let errors = validate(&body).expect_err("should fail");
        assert_eq!(errors[0].message, "Message must be at least 10 characters");

        body["message"] = json!("m".repeat(MESSAGE_MAX_CHARS));
        assert!(validate(&body).is_ok());

        body["message"] = json!("m".repeat(MESSAGE_MAX_CHARS + 1));
        let errors = validate(&body).expect_err("should fail");
        assert_eq!(errors[0].message, "Message must be 2000 characters or less");
    }

    #[test]
    fn test_email_formats() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.domain.example"));

        for bad in ["abc", "a@b", "@b.co", "a@.co", "a@b.", "a@@b.co", "a b@c.de", "a@b c.de"] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_email_is_sanitized_before_checking() {
        let mut body = valid_body();
        body["email"] = json!("  ada@example.com  ");
        let submission = validate(&body).expect("should validate");
        assert_eq!(submission.email, "ada@example.com");
    }

    #[test]
    fn test_validation_is_idempotent_on_sanitized_data() {
        let first = validate(&valid_body()).expect("should validate");
        let again = validate(&json!({
            "name": first.name,
            "email": first.email,
            "message": first.message,
        }))
        .expect("re-validating sanitized output should pass");
        assert_eq!(first, again);
    }
}
