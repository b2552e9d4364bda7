//! Error types for the protocol layer.

/// Errors raised while encoding or decoding snapshots and cached records.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The bytes were malformed, truncated, or did not match the
    /// expected type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The value decoded but violates a protocol rule (for example an
    /// empty cached record).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
