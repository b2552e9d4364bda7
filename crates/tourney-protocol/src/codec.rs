//! Codec trait and implementations.
//!
//! A codec converts between Rust values and bytes. The identity layer
//! uses one to cache the signed-in user; the auction uses one to hand
//! snapshots to a UI. Neither cares which format is used, only that
//! something implements [`Codec`].

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes values to bytes and decodes them back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value cannot be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or do
    /// not match `T`. Empty input is rejected as
    /// `ProtocolError::InvalidMessage`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// Behind the `json` feature (on by default).
///
/// ```rust
/// use tourney_protocol::{Codec, JsonCodec, UserId};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&UserId(7)).unwrap();
/// assert_eq!(bytes, b"7");
/// let back: UserId = codec.decode(&bytes).unwrap();
/// assert_eq!(back, UserId(7));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        if data.is_empty() {
            return Err(ProtocolError::InvalidMessage("empty payload".into()));
        }
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{NoticeKind, Notification};

    #[test]
    fn test_json_decode_empty_is_invalid_message() {
        let result: Result<Notification, _> = JsonCodec.decode(b"");
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }

    #[test]
    fn test_json_decode_garbage_is_decode_error() {
        let result: Result<Notification, _> = JsonCodec.decode(b"{not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_notification_wire_shape() {
        let n = Notification::error("bid_too_low", "too low");
        let bytes = JsonCodec.encode(&n).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["level"], "error");
        assert_eq!(value["kind"]["kind"], "error");
        assert_eq!(value["kind"]["reason"], "bid_too_low");

        let started = JsonCodec
            .encode(&Notification::success(NoticeKind::Started, "go"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&started).unwrap();
        assert_eq!(value["kind"]["kind"], "started");
    }
}
