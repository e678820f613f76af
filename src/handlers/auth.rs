use serde_json::Value;

use crate::domain::Username;
use crate::errors::AppError;

/// Rejects admin-only requests that name someone other than the
/// administrator. A request with a missing or falsy username (`null`, `""`,
/// `false`, `0`) is let through and fails later on its own validation.
pub fn require_admin(admin: &Username, username: &Value) -> Result<(), AppError> {
    match username {
        Value::Null | Value::Bool(false) => Ok(()),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(()),
        Value::String(name) if name.is_empty() || name == admin.as_str() => Ok(()),
        _ => {
            log::warn!("admin request rejected for username {}", username);
            Err(AppError::Unauthorized)
        }
    }
}
