use thiserror::Error;

/// Failures surfaced by the soiling model generator. Generation is pure and
/// synchronous, so an error is reported once to the caller, never retried,
/// never thrown across the read path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("no configuration loaded")]
    ConfigurationMissing,

    #[error("configuration field `{field}` is invalid: {value}")]
    InvalidNumericField { field: &'static str, value: f64 },
}
