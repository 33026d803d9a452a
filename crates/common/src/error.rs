/// A configuration value outside its valid range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be finite")]
    NotFinite { field: &'static str },
    #[error("{field} is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

impl ConfigError {
    /// Check that a value is finite and strictly greater than zero.
    pub fn require_positive(field: &'static str, value: f32) -> Result<(), Self> {
        if !value.is_finite() {
            return Err(Self::NotFinite { field });
        }
        if value <= 0.0 {
            return Err(Self::NotPositive { field, value });
        }
        Ok(())
    }

    /// Check that a value is finite.
    pub fn require_finite(field: &'static str, value: f32) -> Result<(), Self> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Self::NotFinite { field })
        }
    }
}

/// Unknown material name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown material {0:?}")]
pub struct ParseMaterialError(pub String);
