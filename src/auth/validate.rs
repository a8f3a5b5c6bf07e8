use crate::errors::FieldError;

/// Validate a login name: 2-50 chars, letters, digits, `_`, `.` and `-` only.
pub fn validate_login(login: &str) -> Option<FieldError> {
    let trimmed = login.trim();
    if trimmed.is_empty() {
        return Some(FieldError::new("user_login", "Login is required"));
    }
    let len = trimmed.chars().count();
    if len < 2 {
        return Some(FieldError::new("user_login", "Login must be at least 2 characters"));
    }
    if len > 50 {
        return Some(FieldError::new("user_login", "Login must be at most 50 characters"));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Some(FieldError::new(
            "user_login",
            "Login may only contain letters, numbers, '_', '.' and '-'",
        ));
    }
    None
}

/// Passwords only need to be non-blank.
pub fn validate_password(password: &str) -> Option<FieldError> {
    if password.trim().is_empty() {
        return Some(FieldError::new("user_password", "Password cannot be empty"));
    }
    None
}

/// Validate a required text field with a max length (in characters).
pub fn validate_required(value: &str, field: &str, max_len: usize) -> Option<FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(FieldError::new(field, format!("{field} is required")));
    }
    if trimmed.chars().count() > max_len {
        return Some(FieldError::new(field, format!("{field} must be at most {max_len} characters")));
    }
    None
}

/// Validate an optional text field with a max length (absent or empty is OK).
pub fn validate_optional(value: Option<&str>, field: &str, max_len: usize) -> Option<FieldError> {
    match value {
        Some(v) if v.trim().chars().count() > max_len => {
            Some(FieldError::new(field, format!("{field} must be at most {max_len} characters")))
        }
        _ => None,
    }
}
