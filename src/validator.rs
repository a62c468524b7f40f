//! Request Validator
//!
//! TigerStyle: Pure checks run before any side effect.
//!
//! Rules apply in order and the first failure wins:
//! 1. payload non-empty
//! 2. storage kind non-empty
//! 3. storage kind recognized
//! 4. payload within [`PAYLOAD_BYTES_MAX`]

use crate::constants::PAYLOAD_BYTES_MAX;
use crate::request::{SaveRequest, StorageKind};

/// Validates save requests.
#[derive(Debug, Clone, Copy)]
pub struct RequestValidator {
    payload_bytes_max: usize,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestValidator {
    /// Create a validator with the default payload limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            payload_bytes_max: PAYLOAD_BYTES_MAX,
        }
    }

    /// Create a validator with a custom payload limit.
    #[must_use]
    pub fn with_payload_bytes_max(payload_bytes_max: usize) -> Self {
        assert!(payload_bytes_max > 0, "payload limit must be positive");
        Self { payload_bytes_max }
    }

    /// Validate a request, returning the parsed storage kind.
    ///
    /// # Errors
    /// Returns the first rule the request breaks.
    pub fn validate(&self, req: &SaveRequest) -> Result<StorageKind, ValidationError> {
        if req.payload.is_empty() {
            return Err(ValidationError::EmptyPayload);
        }
        if req.storage_kind.is_empty() {
            return Err(ValidationError::EmptyStorageKind);
        }
        let kind = StorageKind::parse(&req.storage_kind)
            .ok_or_else(|| ValidationError::UnsupportedStorageKind(req.storage_kind.clone()))?;
        if req.payload.len() > self.payload_bytes_max {
            return Err(ValidationError::PayloadTooLarge {
                len: req.payload.len(),
                max: self.payload_bytes_max,
            });
        }
        Ok(kind)
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("payload empty")]
    EmptyPayload,

    #[error("storage kind empty")]
    EmptyStorageKind,

    #[error("unsupported storage kind: {0}")]
    UnsupportedStorageKind(String),

    #[error("payload too large: {len} > {max}")]
    PayloadTooLarge { len: usize, max: usize },
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_every_known_kind() {
        let validator = RequestValidator::new();
        for kind in StorageKind::all() {
            let req = SaveRequest::new(b"x".to_vec(), kind.as_str());
            assert_eq!(validator.validate(&req), Ok(*kind));
        }
    }

    #[test]
    fn test_rule_order() {
        let validator = RequestValidator::new();

        // Empty payload wins over everything else
        let req = SaveRequest::new(Vec::new(), "");
        assert_eq!(validator.validate(&req), Err(ValidationError::EmptyPayload));

        let req = SaveRequest::new(b"x".to_vec(), "");
        assert_eq!(validator.validate(&req), Err(ValidationError::EmptyStorageKind));

        let req = SaveRequest::new(b"x".to_vec(), "redis");
        let err = validator.validate(&req).unwrap_err();
        assert_eq!(err.to_string(), "unsupported storage kind: redis");
    }

    #[test]
    fn test_payload_limit() {
        let validator = RequestValidator::with_payload_bytes_max(4);

        let req = SaveRequest::new(b"abcd".to_vec(), "memory");
        assert!(validator.validate(&req).is_ok());

        let req = SaveRequest::new(b"abcde".to_vec(), "memory");
        assert_eq!(
            validator.validate(&req),
            Err(ValidationError::PayloadTooLarge { len: 5, max: 4 })
        );
    }
}
