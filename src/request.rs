//! Save Request
//!
//! TigerStyle: Wire shape of a save request and the storage kinds it can name.
//!
//! On the wire the payload is base64 text:
//!
//! ```json
//! { "data": "SGVsbG8=", "storage_type": "memory" }
//! ```
//!
//! Missing or `null` fields decode as empty values so that the validator,
//! not the decoder, reports them.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Deserializer};

// =============================================================================
// Storage Kind
// =============================================================================

/// Recognized storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// Single file on local disk
    File,
    /// Shared database connection
    Database,
    /// In-process memory store
    Memory,
}

impl StorageKind {
    /// Get string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Database => "database",
            Self::Memory => "memory",
        }
    }

    /// Parse from the wire identifier. Matching is exact.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "file" => Some(Self::File),
            "database" => Some(Self::Database),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }

    /// Get all storage kinds in order.
    #[must_use]
    pub fn all() -> &'static [StorageKind] {
        &[Self::File, Self::Database, Self::Memory]
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Save Request
// =============================================================================

/// A decoded save request.
///
/// `storage_kind` stays a raw string here; the validator turns it into a
/// [`StorageKind`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveRequest {
    /// Decoded payload bytes
    #[serde(rename = "data", default, deserialize_with = "deserialize_base64")]
    pub payload: Vec<u8>,
    /// Requested storage backend identifier
    #[serde(rename = "storage_type", default, deserialize_with = "deserialize_nullable_string")]
    pub storage_kind: String,
}

impl SaveRequest {
    /// Create a request from raw parts.
    pub fn new(payload: impl Into<Vec<u8>>, storage_kind: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            storage_kind: storage_kind.into(),
        }
    }

    /// Decode a request from a JSON body.
    ///
    /// # Errors
    /// Returns the serde error if the body is not a JSON object of the
    /// expected shape or `data` is not valid base64.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

fn deserialize_base64<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded: Option<String> = Option::deserialize(deserializer)?;
    match encoded {
        Some(s) => BASE64
            .decode(s.as_bytes())
            .map_err(|e| serde::de::Error::custom(format!("invalid base64 in data: {e}"))),
        None => Ok(Vec::new()),
    }
}

fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Tests
// =============================================================================
