//! Field validation for submitted tickets.

use crate::types::{TicketInput, TicketStatus, ValidationErrors};

/// Message for a missing or blank title
pub const TITLE_REQUIRED: &str = "Title is required";

/// Message for a missing or empty status
pub const STATUS_REQUIRED: &str = "Status is required";

/// Message for a status outside the known values
pub const INVALID_STATUS: &str = "Invalid status value";

/// Check submitted fields, returning one message per rejected field.
///
/// An empty result means the input is acceptable. Only `title` and `status`
/// are checked; `description` and `priority` are free-form.
#[must_use]
pub fn validate(input: &TicketInput) -> ValidationErrors {
    validated_status(input).err().unwrap_or_default()
}

/// Validate the input and return its parsed status.
///
/// # Errors
///
/// Returns every rejected field when the input is not acceptable.
pub fn validated_status(input: &TicketInput) -> Result<TicketStatus, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if input.title.as_deref().is_none_or(|title| title.trim().is_empty()) {
        errors.insert("title", TITLE_REQUIRED);
    }

    let status = match input.status.as_deref() {
        None | Some("") => {
            errors.insert("status", STATUS_REQUIRED);
            None
        },
        Some(raw) => {
            let parsed = raw.parse::<TicketStatus>().ok();
            if parsed.is_none() {
                errors.insert("status", INVALID_STATUS);
            }
            parsed
        },
    };

    match status {
        Some(status) if errors.is_empty() => Ok(status),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: Option<&str>, status: Option<&str>) -> TicketInput {
        TicketInput {
            title: title.map(str::to_string),
            status: status.map(str::to_string),
            ..TicketInput::default()
        }
    }

    #[test]
    fn empty_title_is_the_only_error() {
        let errors = validate(&input(Some(""), Some("open")));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("title"), Some(TITLE_REQUIRED));
    }

    #[test]
    fn blank_title_is_rejected() {
        let errors = validate(&input(Some("   \t"), Some("closed")));
        assert_eq!(errors.get("title"), Some(TITLE_REQUIRED));
    }

    #[test]
    fn unknown_status_is_invalid() {
        let errors = validate(&input(Some("Fix bug"), Some("bogus")));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("status"), Some(INVALID_STATUS));
    }

    #[test]
    fn status_spelling_is_exact() {
        let errors = validate(&input(Some("Fix bug"), Some("Open")));
        assert_eq!(errors.get("status"), Some(INVALID_STATUS));

        let errors = validate(&input(Some("Fix bug"), Some("in-progress")));
        assert_eq!(errors.get("status"), Some(INVALID_STATUS));
    }

    #[test]
    fn missing_everything_reports_both_fields() {
        let errors = validate(&TicketInput::default());
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["status", "title"]);
        assert_eq!(errors.get("status"), Some(STATUS_REQUIRED));

        let errors = validate(&input(None, Some("")));
        assert_eq!(errors.get("status"), Some(STATUS_REQUIRED));
    }

    #[test]
    fn valid_input_yields_status() {
        assert!(validate(&input(Some("Fix bug"), Some("in_progress"))).is_empty());
        assert_eq!(
            validated_status(&input(Some("Fix bug"), Some("in_progress"))),
            Ok(TicketStatus::InProgress)
        );
    }
}
