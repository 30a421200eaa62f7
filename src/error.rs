use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, GreenhouseError>;

/// Errors raised by the simulation core.
///
/// Nothing in the core talks to the outside world during a step, so every
/// variant except `Config`/`Io` marks a caller handing the model a value it
/// can never represent (an absorption proportion of 1.4, a horizontal wave).
#[derive(Debug, Error)]
pub enum GreenhouseError {
    /// Out-of-range setter or configuration value.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Wave construction rejected (direction or limit inconsistent).
    #[error("invalid wave: {0}")]
    InvalidWave(String),

    /// Command that the active screen does not offer.
    #[error("not available on this screen: {0}")]
    UnsupportedOnScreen(&'static str),

    /// Malformed JSON configuration.
    #[error(transparent)]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reject values outside the closed unit interval.
pub(crate) fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GreenhouseError::InvalidParam(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

/// Reject values outside `[min, max]`.
pub(crate) fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(GreenhouseError::InvalidParam(format!(
            "{name} must be within [{min}, {max}], got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = GreenhouseError::InvalidParam("albedo must be within [0, 0.9]".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid parameter"));
        assert!(msg.contains("albedo"));
    }

    #[test]
    fn unit_interval_bounds() {
        assert!(check_unit_interval("p", 0.0).is_ok());
        assert!(check_unit_interval("p", 1.0).is_ok());
        assert!(check_unit_interval("p", 1.0001).is_err());
        assert!(check_unit_interval("p", -0.1).is_err());
        assert!(check_unit_interval("p", f64::NAN).is_err());
    }

    #[test]
    fn range_rejects_nan() {
        assert!(check_range("m", 1.0, 0.5, 2.0).is_ok());
        assert!(check_range("m", f64::NAN, 0.5, 2.0).is_err());
        assert!(check_range("m", 2.5, 0.5, 2.0).is_err());
    }
}
