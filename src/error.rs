use thiserror::Error;

/// Errors raised before any pixel work begins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    #[error("Invalid dimension: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, SynthError>;

/// Reject empty buffers up front
pub(crate) fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(SynthError::InvalidDimension { width, height });
    }
    Ok(())
}
