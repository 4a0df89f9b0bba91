//! Small field validators shared by the domain crates.

use crate::FieldError;

/// Normalise and check a contact address: one `@`, non-empty local and domain
/// parts, a dot in the domain, no whitespace. Returns the trimmed, lowercased form.
pub fn email(field: &'static str, raw: &str) -> Result<String, FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FieldError::new(field, "must not be empty"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(FieldError::new(field, "must not contain whitespace"));
    }

    let mut parts = value.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(FieldError::new(field, "must contain exactly one '@'")),
    };
    if local.is_empty() || domain.is_empty() {
        return Err(FieldError::new(field, "must have a local part and a domain"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(FieldError::new(field, "domain is malformed"));
    }

    Ok(value.to_lowercase())
}

/// Trimmed, non-empty text.
pub fn non_empty(field: &'static str, raw: &str) -> Result<String, FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        Err(FieldError::new(field, "must not be empty"))
    } else {
        Ok(value.to_string())
    }
}
