use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} must be within {min}..={max}, got {value}")]
pub struct RangeError {
    pub field: &'static str,
    pub value: i64,
    pub min: i64,
    pub max: i64,
}

impl RangeError {
    pub fn new(field: &'static str, value: i64, min: i64, max: i64) -> Self {
        Self {
            field,
            value,
            min,
            max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sorting algorithm '{name}'")]
pub struct ParseAlgorithmError {
    pub name: String,
}

impl ParseAlgorithmError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
