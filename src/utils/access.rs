use crate::error::{AppError, Result};

/// 所有权检查：只有作者本人可以修改记录
///
/// Callers run this after the record has been found, so a missing record is
/// always reported as NotFound rather than Forbidden.
pub fn ensure_owner(owner_id: u64, current_user_id: u64, message: &str) -> Result<()> {
    if owner_id != current_user_id {
        tracing::warn!(
            "User {} denied access to resource owned by {}",
            current_user_id,
            owner_id
        );
        return Err(AppError::forbidden(message));
    }
    Ok(())
}

/// Parse a numeric path id, mapping garbage to a JSON BadRequest.
pub fn parse_id(raw: &str, resource: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} ID", resource)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_owner() {
        assert!(ensure_owner(1, 1, "nope").is_ok());
        assert!(matches!(
            ensure_owner(2, 1, "nope"),
            Err(AppError::Authorization(_))
        ));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "post").unwrap(), 42);
        assert!(matches!(parse_id("abc", "post"), Err(AppError::BadRequest(ref m)) if m == "Invalid post ID"));
        assert!(parse_id("-1", "post").is_err());
    }
}
