//! Payload Codec Module
//!
//! Compresses serialized payload text into a base64 string suitable for a
//! text-only cache entry, and reverses the process on read. Decoding
//! malformed input is a hard failure: a partially recovered payload must
//! never leave this module.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{AdapterError, Result};

// == Crush ==
/// Compresses text into a base64-encoded string.
///
/// LZ4 block mode with the uncompressed size prepended, so decompression
/// needs no out-of-band length. The output is never empty, even for empty
/// input.
pub fn crush(text: &str) -> Result<String> {
    let compressed = lz4::block::compress(text.as_bytes(), None, true)
        .map_err(|e| AdapterError::Internal(format!("compression failed: {}", e)))?;
    Ok(STANDARD.encode(compressed))
}

// == Uncrush ==
/// Reverses [`crush`], recovering the original text.
///
/// Any failure (bad base64, bad compressed framing, non-UTF-8 output)
/// is reported as a corrupt payload.
pub fn uncrush(encoded: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| AdapterError::CorruptPayload(format!("invalid base64: {}", e)))?;

    let raw = lz4::block::decompress(&bytes, None)
        .map_err(|e| AdapterError::CorruptPayload(format!("decompression failed: {}", e)))?;

    String::from_utf8(raw)
        .map_err(|e| AdapterError::CorruptPayload(format!("payload is not UTF-8: {}", e)))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdapterError;

    #[test]
    fn test_codec_round_trip() {
        let text = r#"{"rows":[{"Id":1,"Name":"alpha"},{"Id":2,"Name":"beta"}]}"#;

        let crushed = crush(text).unwrap();
        let recovered = uncrush(&crushed).unwrap();

        assert_eq!(recovered, text);
    }

    #[test]
    fn test_codec_round_trip_empty() {
        let crushed = crush("").unwrap();
        assert!(!crushed.is_empty());
        assert_eq!(uncrush(&crushed).unwrap(), "");
    }

    #[test]
    fn test_codec_round_trip_unicode() {
        let text = "tabellé データ ✓";
        assert_eq!(uncrush(&crush(text).unwrap()).unwrap(), text);
    }

    #[test]
    fn test_codec_compresses_repetitive_payloads() {
        let text = "abcdefgh".repeat(10_000);
        let crushed = crush(&text).unwrap();
        assert!(crushed.len() < text.len());
    }

    #[test]
    fn test_uncrush_rejects_invalid_base64() {
        let result = uncrush("not base64 at all!!!");
        assert!(matches!(result, Err(AdapterError::CorruptPayload(_))));
    }

    #[test]
    fn test_uncrush_rejects_garbage_bytes() {
        // Valid base64, but not a valid compressed block.
        let garbage = STANDARD.encode(b"definitely not compressed data");
        let result = uncrush(&garbage);
        assert!(matches!(result, Err(AdapterError::CorruptPayload(_))));
    }

    #[test]
    fn test_uncrush_rejects_truncated_payload() {
        let crushed = crush("some payload that will be cut short").unwrap();
        let truncated = &crushed[..crushed.len() / 2];
        assert!(uncrush(truncated).is_err());
    }
}
