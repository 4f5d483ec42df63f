use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("max progress must be a finite value greater than zero, got {0}")]
    InvalidMaxProgress(f64),
    #[error("current progress must be finite, got {0}")]
    NonFiniteProgress(f64),
    #[error("{component} must be within [0, 1], got {value}")]
    ComponentOutOfRange { component: &'static str, value: f64 },
}

pub(crate) fn check_unit(component: &'static str, value: f64) -> Result<f64, ChartError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ChartError::ComponentOutOfRange { component, value })
    }
}
