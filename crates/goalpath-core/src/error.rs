//! Error types for goalpath

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reject NaN and infinities before they reach any formula
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid(format!("{} must be a finite number", field)))
    }
}

/// Finite and `>= 0`
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<f64> {
    let value = ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(Error::invalid(format!(
            "{} must be >= 0 (got {})",
            field, value
        )));
    }
    Ok(value)
}

/// Finite and within `[0, 1]`
pub(crate) fn ensure_unit_interval(field: &str, value: f64) -> Result<f64> {
    let value = ensure_finite(field, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::invalid(format!(
            "{} must be within [0, 1] (got {})",
            field, value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_helpers() {
        assert_eq!(ensure_non_negative("x", 0.0).unwrap(), 0.0);
        assert!(ensure_non_negative("x", -0.01).is_err());
        assert!(ensure_finite("x", f64::NAN).is_err());
        assert!(ensure_finite("x", f64::INFINITY).is_err());
        assert!(ensure_unit_interval("x", 1.0).is_ok());
        assert!(ensure_unit_interval("x", 1.01).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = Error::invalid("target_amount must be > 0");
        assert_eq!(err.to_string(), "Invalid input: target_amount must be > 0");
    }
}
