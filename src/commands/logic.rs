//! Pure validation logic extracted from the command orchestrator.
//!
//! These functions take plain parameters and run before any network call; a
//! rejection here means the write operation is never invoked and no state
//! changes. Unit-testable without a runtime.

use crate::error::AppError;

/// Validate a block reason: must be non-empty after trimming.
pub fn validate_reason(reason: &str) -> Result<String, AppError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("A block reason is required".into()));
    }
    Ok(trimmed.to_string())
}

/// Parse a candidate port: empty means "all ports", otherwise a positive u16.
pub fn parse_port(port: &str) -> Result<Option<u16>, AppError> {
    let trimmed = port.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u16>() {
        Ok(0) | Err(_) => Err(AppError::InvalidInput(format!(
            "Port must be a positive integer, got '{trimmed}'"
        ))),
        Ok(port) => Ok(Some(port)),
    }
}

/// Validate a manually typed address: must be non-empty after trimming.
///
/// The manual-unblock path has no corresponding client entry to validate
/// against, so non-emptiness is the only check possible.
pub fn validate_address(address: &str) -> Result<String, AppError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("An address is required".into()));
    }
    Ok(trimmed.to_string())
}
