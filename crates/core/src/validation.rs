//! Input validation for user-submitted content.

use crate::error::CoreError;

/// Shortest accepted comment, after trimming.
pub const MIN_COMMENT_LEN: usize = 3;
/// Longest accepted comment, after trimming.
pub const MAX_COMMENT_LEN: usize = 1000;
/// Shortest accepted crackme name, after trimming.
pub const MIN_CRACKME_NAME_LEN: usize = 3;
/// Longest accepted user name.
pub const MAX_USER_NAME_LEN: usize = 64;
/// Shortest accepted solution description, after trimming.
pub const MIN_SOLUTION_INFO_LEN: usize = 10;
/// Longest accepted crackme or solution description.
pub const MAX_INFO_LEN: usize = 5000;
/// Longest accepted language / architecture / platform label.
pub const MAX_LABEL_LEN: usize = 64;

/// Validate comment content and return it trimmed.
pub fn validate_comment_content(content: &str) -> Result<&str, CoreError> {
    let trimmed = content.trim();
    let len = trimmed.chars().count();
    if len < MIN_COMMENT_LEN {
        return Err(CoreError::Validation(format!(
            "Comment must be at least {MIN_COMMENT_LEN} characters"
        )));
    }
    if len > MAX_COMMENT_LEN {
        return Err(CoreError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(trimmed)
}

/// Validate a crackme name and return it trimmed.
pub fn validate_crackme_name(name: &str) -> Result<&str, CoreError> {
    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_CRACKME_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Crackme name must be at least {MIN_CRACKME_NAME_LEN} characters"
        )));
    }
    Ok(trimmed)
}

/// Validate a required short label such as a crackme's language,
/// architecture or platform, and return it trimmed.
pub fn validate_label<'a>(field: &str, value: &'a str) -> Result<&'a str, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_LABEL_LEN {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_LABEL_LEN} characters"
        )));
    }
    Ok(trimmed)
}

/// Validate an optional crackme description and return it trimmed.
pub fn validate_crackme_info(info: &str) -> Result<&str, CoreError> {
    let trimmed = info.trim();
    if trimmed.chars().count() > MAX_INFO_LEN {
        return Err(CoreError::Validation(format!(
            "Description must be at most {MAX_INFO_LEN} characters"
        )));
    }
    Ok(trimmed)
}

/// Validate a solution write-up and return it trimmed.
pub fn validate_solution_info(info: &str) -> Result<&str, CoreError> {
    let trimmed = info.trim();
    let len = trimmed.chars().count();
    if len < MIN_SOLUTION_INFO_LEN {
        return Err(CoreError::Validation(format!(
            "Solution description must be at least {MIN_SOLUTION_INFO_LEN} characters"
        )));
    }
    if len > MAX_INFO_LEN {
        return Err(CoreError::Validation(format!(
            "Solution description must be at most {MAX_INFO_LEN} characters"
        )));
    }
    Ok(trimmed)
}

/// Validate a user name against `[A-Za-z0-9_-]{1,64}`.
///
/// User names end up in stored file names, so this is the same allow-list
/// the storage layer relies on.
pub fn validate_user_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() || name.len() > MAX_USER_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "User name must be 1 to {MAX_USER_NAME_LEN} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(CoreError::Validation(format!(
            "Invalid user name '{name}': only letters, digits, '_' and '-' are allowed"
        )));
    }
    Ok(())
}
