//! Length-prefixed JSON framing over TCP.
//!
//! ## Frame layout
//!
//! Each frame is a 4-byte big-endian payload length followed by exactly that
//! many bytes of UTF-8 JSON. The decoder reassembles frames across partial
//! socket reads — a single read is never assumed to align with a single
//! message — and rejects declared lengths above the configured ceiling
//! before buffering them, so a hostile peer cannot make the server allocate
//! unboundedly.
//!
//! Decoded payloads must be JSON objects (key/value messages). Anything
//! else is a [`FramingError`], and a framing error always closes the
//! connection.

use bytes::{Buf, BufMut, BytesMut};
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};

/// Default ceiling for a single frame's payload, in bytes
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Errors produced while encoding or decoding frames
#[derive(Debug, Error)]
pub enum FramingError {
    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },

    #[error("frame payload is not valid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("frame payload is not a JSON object")]
    NotAnObject,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Codec turning a byte stream into JSON object frames and back.
///
/// The decoder yields [`serde_json::Value`]s guaranteed to be objects;
/// the encoder takes pre-serialized JSON strings and prepends the length
/// word.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    max_frame_len: usize,
}

impl FrameCodec {
    pub fn new(max_frame_len: usize) -> Self {
        Self { max_frame_len }
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(MAX_FRAME_LEN)
    }
}

impl Decoder for FrameCodec {
    type Item = serde_json::Value;
    type Error = FramingError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < 4 {
            return Ok(None);
        }

        let declared = u32::from_be_bytes([src[0], src[1], src[2], src[3]]) as usize;
        if declared > self.max_frame_len {
            return Err(FramingError::FrameTooLarge {
                len: declared,
                max: self.max_frame_len,
            });
        }

        if src.len() < 4 + declared {
            // partial frame: reserve what is still missing and wait
            src.reserve(4 + declared - src.len());
            return Ok(None);
        }

        src.advance(4);
        let payload = src.split_to(declared);
        let value: serde_json::Value = serde_json::from_slice(&payload)?;
        if !value.is_object() {
            return Err(FramingError::NotAnObject);
        }
        Ok(Some(value))
    }
}

impl Encoder<String> for FrameCodec {
    type Error = FramingError;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let payload = item.as_bytes();
        if payload.len() > self.max_frame_len {
            return Err(FramingError::FrameTooLarge {
                len: payload.len(),
                max: self.max_frame_len,
            });
        }

        dst.reserve(4 + payload.len());
        dst.put_u32(payload.len() as u32);
        dst.extend_from_slice(payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode_frame(payload: &str) -> BytesMut {
        let mut codec = FrameCodec::default();
        let mut buf = BytesMut::new();
        codec.encode(payload.to_string(), &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_encode_prepends_big_endian_length() {
        // given:
        let payload = r#"{"cmd":"users"}"#;

        // when:
        let buf = encode_frame(payload);

        // then:
        assert_eq!(&buf[..4], &(payload.len() as u32).to_be_bytes());
        assert_eq!(&buf[4..], payload.as_bytes());
    }

    #[test]
    fn test_decode_roundtrips_encoded_frame() {
        // given:
        let mut codec = FrameCodec::default();
        let mut buf = encode_frame(r#"{"cmd":"login","user":"Ana"}"#);

        // when:
        let decoded = codec.decode(&mut buf).unwrap();

        // then:
        assert_eq!(decoded, Some(json!({"cmd": "login", "user": "Ana"})));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_waits_for_length_prefix() {
        // given: fewer than four header bytes
        let mut codec = FrameCodec::default();
        let mut buf = BytesMut::from(&[0u8, 0, 0][..]);

        // when:
        let decoded = codec.decode(&mut buf).unwrap();

        // then:
        assert_eq!(decoded, None);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_decode_waits_for_full_payload() {
        // given: a complete header but a truncated payload
        let full = encode_frame(r#"{"cmd":"typing"}"#);
        let mut codec = FrameCodec::default();
        let mut buf = BytesMut::from(&full[..full.len() - 5]);

        // when:
        let decoded = codec.decode(&mut buf).unwrap();

        // then:
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_decode_reassembles_frame_fed_byte_by_byte() {
        // given:
        let full = encode_frame(r#"{"cmd":"users"}"#);
        let mut codec = FrameCodec::default();
        let mut buf = BytesMut::new();

        // when: bytes arrive one at a time
        let mut result = None;
        for (i, byte) in full.iter().enumerate() {
            buf.put_u8(*byte);
            result = codec.decode(&mut buf).unwrap();
            if i < full.len() - 1 {
                assert_eq!(result, None, "decoded early at byte {}", i);
            }
        }

        // then: only the final byte completes the frame
        assert_eq!(result, Some(json!({"cmd": "users"})));
    }

    #[test]
    fn test_decode_yields_frames_one_at_a_time() {
        // given: two frames back to back in one buffer
        let mut buf = encode_frame(r#"{"cmd":"users"}"#);
        buf.extend_from_slice(&encode_frame(r#"{"cmd":"typing"}"#));
        let mut codec = FrameCodec::default();

        // when:
        let first = codec.decode(&mut buf).unwrap();
        let second = codec.decode(&mut buf).unwrap();
        let third = codec.decode(&mut buf).unwrap();

        // then:
        assert_eq!(first, Some(json!({"cmd": "users"})));
        assert_eq!(second, Some(json!({"cmd": "typing"})));
        assert_eq!(third, None);
    }

    #[test]
    fn test_decode_rejects_oversized_declared_length() {
        // given: a header declaring a payload beyond the ceiling
        let mut codec = FrameCodec::default();
        let mut buf = BytesMut::new();
        buf.put_u32((MAX_FRAME_LEN + 1) as u32);

        // when:
        let result = codec.decode(&mut buf);

        // then: rejected before any payload arrives
        assert!(matches!(
            result.unwrap_err(),
            FramingError::FrameTooLarge { .. }
        ));
    }

    #[test]
    fn test_decode_rejects_malformed_payload() {
        // given:
        let mut codec = FrameCodec::default();
        let mut buf = encode_frame("this is not json");

        // when:
        let result = codec.decode(&mut buf);

        // then:
        assert!(matches!(
            result.unwrap_err(),
            FramingError::InvalidPayload(_)
        ));
    }

    #[test]
    fn test_decode_rejects_non_object_payload() {
        // given: valid JSON that is not a key/value message
        let mut codec = FrameCodec::default();
        let mut buf = encode_frame("42");

        // when:
        let result = codec.decode(&mut buf);

        // then:
        assert!(matches!(result.unwrap_err(), FramingError::NotAnObject));
    }

    #[test]
    fn test_encode_rejects_oversized_payload() {
        // given: a codec with a tiny ceiling
        let mut codec = FrameCodec::new(8);
        let mut buf = BytesMut::new();

        // when:
        let result = codec.encode(r#"{"cmd":"users"}"#.to_string(), &mut buf);

        // then:
        assert!(matches!(
            result.unwrap_err(),
            FramingError::FrameTooLarge { .. }
        ));
        assert!(buf.is_empty());
    }
}
