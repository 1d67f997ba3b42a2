use crate::error::AppError;

/// Trims a required query value, treating blank as missing.
pub fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Configuration(message.to_string()))
}
