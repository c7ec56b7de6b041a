//! Single-field validation for form mode (§4.9), applied before the LLM
//! ever sees the turn.

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub errors: Vec<String>,
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\d\s\-\(\)\+]+$").unwrap())
}

/// `validate_field(field_id, field_value) -> Ok(()) | Err(errors)`. Rules
/// applied in order, first failure wins (the spec describes one error at a
/// time per field, not an accumulated list).
pub fn validate_field(field_id: &str, field_value: &str) -> Result<(), ValidationError> {
    let trimmed = field_value.trim();

    if trimmed.is_empty() {
        return Err(single(field_id, "This field is required"));
    }

    match field_id {
        "email" => {
            if !email_re().is_match(trimmed) {
                return Err(single(field_id, "Please enter a valid email address"));
            }
        }
        "phone" => {
            if !phone_re().is_match(trimmed) {
                return Err(single(field_id, "Please enter a valid phone number"));
            }
        }
        "age_confirm" => {
            if trimmed.eq_ignore_ascii_case("no") {
                return Err(single(field_id, "You must be at least 22 years old to volunteer"));
            }
        }
        "commitment_confirm" => {
            if trimmed.eq_ignore_ascii_case("no") {
                return Err(single(field_id, "A one year commitment is required for this program"));
            }
        }
        _ => {}
    }

    Ok(())
}

fn single(field_id: &str, message: &str) -> ValidationError {
    ValidationError {
        field: field_id.to_string(),
        errors: vec![message.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_is_required_error() {
        let err = validate_field("first_name", "   ").unwrap_err();
        assert_eq!(err.errors, vec!["This field is required".to_string()]);
    }

    #[test]
    fn valid_email_passes() {
        assert!(validate_field("email", "ada@example.com").is_ok());
    }

    #[test]
    fn invalid_email_fails() {
        let err = validate_field("email", "not-an-email").unwrap_err();
        assert_eq!(err.errors[0], "Please enter a valid email address");
    }

    #[test]
    fn valid_phone_passes() {
        assert!(validate_field("phone", "(555) 123-4567").is_ok());
    }

    #[test]
    fn invalid_phone_fails() {
        let err = validate_field("phone", "call me maybe").unwrap_err();
        assert_eq!(err.errors[0], "Please enter a valid phone number");
    }

    #[test]
    fn age_confirm_no_is_rejected() {
        let err = validate_field("age_confirm", "no").unwrap_err();
        assert_eq!(err.errors[0], "You must be at least 22 years old to volunteer");
    }

    #[test]
    fn age_confirm_yes_passes() {
        assert!(validate_field("age_confirm", "yes").is_ok());
    }

    #[test]
    fn commitment_confirm_no_is_rejected() {
        let err = validate_field("commitment_confirm", "no").unwrap_err();
        assert_eq!(err.errors[0], "A one year commitment is required for this program");
    }

    #[test]
    fn unrelated_field_accepts_any_nonblank_value() {
        assert!(validate_field("favorite_color", "teal").is_ok());
    }
}
