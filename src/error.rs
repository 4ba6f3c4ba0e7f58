//! Error types for sizing runs and their configuration.

use std::fmt;

use thiserror::Error;

/// Result type for sizing operations.
pub type Result<T> = std::result::Result<T, SizingError>;

/// Validation error with field path and constraint description.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"options.battery.efficiency"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    /// Creates an error for `field` with the given constraint message.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Errors returned by the sizing core and its outer surfaces.
#[derive(Debug, Error)]
pub enum SizingError {
    /// Input series or options rejected before any simulation ran.
    #[error("invalid input: {0}")]
    InvalidInput(ConfigError),

    /// No candidate met demand within tolerance.
    ///
    /// `best_margin` is the largest feasibility margin found in the final
    /// population (still below the tolerance).
    #[error("no feasible capacity mix found (best feasibility margin {best_margin:.6})")]
    Infeasible { best_margin: f64 },

    /// The run was cancelled through its cancel token.
    #[error("sizing cancelled after {generation} generations")]
    Cancelled { generation: usize },

    /// The background worker thread could not be started.
    #[error("failed to start sizing worker: {0}")]
    TaskSpawn(#[source] std::io::Error),

    /// The background worker exited without delivering a result.
    #[error("sizing worker exited without a result")]
    TaskLost,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse or write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<ConfigError> for SizingError {
    fn from(e: ConfigError) -> Self {
        SizingError::InvalidInput(e)
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for SizingError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        SizingError::TaskLost
    }
}

/// Converts the first collected validation error into [`SizingError::InvalidInput`].
pub(crate) fn first_error(errors: Vec<ConfigError>) -> Result<()> {
    match errors.into_iter().next() {
        Some(e) => Err(SizingError::InvalidInput(e)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_names_field() {
        let e = ConfigError::new("options.years", "must be > 0");
        assert_eq!(e.to_string(), "invalid options.years: must be > 0");
    }

    #[test]
    fn first_error_passes_when_empty() {
        assert!(first_error(Vec::new()).is_ok());
    }

    #[test]
    fn first_error_keeps_first_field() {
        let errors = vec![
            ConfigError::new("load", "must not be empty"),
            ConfigError::new("pv_unit", "must not be empty"),
        ];
        match first_error(errors) {
            Err(SizingError::InvalidInput(e)) => assert_eq!(e.field, "load"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
