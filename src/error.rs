use thiserror::Error;

/// Errors raised while validating inputs or running the picking pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VelocityError {
    /// Two inputs that must align positionally have different lengths.
    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// An axis that must hold at least one value is empty.
    #[error("The {axis} axis is empty")]
    EmptyAxis { axis: &'static str },
    /// An axis that must be strictly ascending is not.
    #[error("The {axis} axis is not strictly ascending at index {index}")]
    NotAscending { axis: &'static str, index: usize },
    /// A scalar parameter is outside its valid domain.
    #[error("Invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// The path search scored more terminal paths than allowed.
    #[error("Path search exceeded its budget of {limit} scored paths")]
    SearchBudgetExceeded { limit: usize },
}

pub(crate) fn ensure_len(what: &'static str, expected: usize, actual: usize) -> Result<(), VelocityError> {
    if expected != actual {
        return Err(VelocityError::ShapeMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

pub(crate) fn ensure_ascending(axis: &'static str, values: &[f32]) -> Result<(), VelocityError> {
    if values.is_empty() {
        return Err(VelocityError::EmptyAxis { axis });
    }
    for (index, value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(VelocityError::NotAscending { axis, index });
        }
        if index > 0 && values[index - 1] >= *value {
            return Err(VelocityError::NotAscending { axis, index });
        }
    }
    Ok(())
}
