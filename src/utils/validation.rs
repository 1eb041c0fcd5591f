use crate::error::{AppError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// 验证邮箱格式
pub fn validate_email_format(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(AppError::validation("Email is required"));
    }

    if email.len() > 254 {
        return Err(AppError::validation("Email is too long"));
    }

    if !validator::validate_email(email) {
        return Err(AppError::validation("Invalid email format"));
    }

    Ok(())
}

/// 验证用户名格式
pub fn validate_username(username: &str) -> Result<()> {
    static USERNAME: OnceLock<Regex> = OnceLock::new();

    if username.trim().is_empty() {
        return Err(AppError::validation("Username is required"));
    }

    if username.len() < 3 {
        return Err(AppError::validation("Username must be at least 3 characters"));
    }

    if username.len() > 30 {
        return Err(AppError::validation("Username must be at most 30 characters"));
    }

    // 用户名只能包含字母、数字、下划线和连字符
    let pattern = USERNAME.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9_-]+$").expect("username pattern is valid")
    });
    if !pattern.is_match(username) {
        return Err(AppError::validation(
            "Username may only contain letters, digits, underscores and hyphens",
        ));
    }

    Ok(())
}

/// Non-blank text no longer than `max` characters.
pub fn validate_content(content: &str, max: usize, field: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }

    if content.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }

    Ok(())
}

/// Key used by the username/email lookup indexes.
pub fn index_key(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_format() {
        assert!(validate_email_format("user@example.com").is_ok());
        assert!(validate_email_format("").is_err());
        assert!(validate_email_format("invalid-email").is_err());
        assert!(validate_email_format(&"a".repeat(255)).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("user123").is_ok());
        assert!(validate_username("test_user").is_ok());
        assert!(validate_username("user-name").is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("user@name").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());

        assert!(matches!(
            validate_username("ab"),
            Err(AppError::Validation(ref msg)) if msg == "Username must be at least 3 characters"
        ));
    }

    #[test]
    fn test_validate_content() {
        assert!(validate_content("hello", 10, "Content").is_ok());
        assert!(validate_content("   ", 10, "Content").is_err());
        assert!(validate_content("abcdefghijk", 10, "Content").is_err());
        // counted in characters, not bytes
        assert!(validate_content("ééééé", 5, "Content").is_ok());
    }

    #[test]
    fn test_index_key() {
        assert_eq!(index_key("  Alice@Example.COM "), "alice@example.com");
    }
}
