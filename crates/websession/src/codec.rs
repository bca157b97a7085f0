//! Payload codec (JSON).
//!
//! Stateless free functions: every call builds its own encoder state, so
//! concurrent store operations never share a buffer.

use thiserror::Error;
use websession_core::SessionPayload;

/// Codec error.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Encode a payload to bytes.
///
/// Deterministic: the payload map is ordered, so equal payloads always
/// produce equal bytes.
///
/// # Errors
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode(payload: &SessionPayload) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(payload).map_err(CodecError::Encode)
}

/// Decode a payload from bytes.
///
/// # Errors
/// Returns [`CodecError::Decode`] for truncated or malformed input; never
/// yields a partial payload.
pub fn decode(bytes: &[u8]) -> Result<SessionPayload, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}
