//! Admin surface: users, every resume, and provider API keys.
//! All routes sit behind `require_auth` + `require_admin`.

pub mod handlers;

use crate::editor::validation::has_min_len;
use crate::errors::AppError;

fn check_len(value: &str, min: usize, label: &str) -> Result<(), AppError> {
    if has_min_len(value, min) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{label} must be at least {min} characters"
        )))
    }
}

pub fn validate_key_name(name: &str) -> Result<(), AppError> {
    check_len(name, 2, "Name")
}

pub fn validate_key_secret(key: &str) -> Result<(), AppError> {
    check_len(key, 10, "API key")
}

pub fn validate_key_provider(provider: &str) -> Result<(), AppError> {
    check_len(provider, 2, "Provider")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_field_lengths() {
        assert!(validate_key_name("OR").is_ok());
        assert!(validate_key_secret("sk-or-1234").is_ok());
        assert!(validate_key_secret("short").is_err());
        assert!(validate_key_provider("x").is_err());
    }
}
