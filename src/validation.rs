use crate::error::AppError;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub fn require_valid_id(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must be a valid ID")));
    }
    Ok(())
}

/// Clamp any numeric rating (form input, AI sentiment score) into 1..=10.
pub fn clamp_rating(value: i64) -> u8 {
    value.clamp(MIN_RATING as i64, MAX_RATING as i64) as u8
}

/// Backend endpoints must be absolute http(s) URLs.
pub fn require_http_endpoint(value: &str) -> Result<url::Url, AppError> {
    let parsed = url::Url::parse(value.trim())
        .map_err(|e| AppError::Config(format!("invalid endpoint '{value}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(AppError::Config(format!(
            "endpoint must use http or https, got '{other}'"
        ))),
    }
}
