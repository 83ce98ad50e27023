//! Payload encoding and decoding.
//!
//! Payloads are CBOR-encoded and bounded by [`MAX_PAYLOAD_SIZE`] in both
//! directions. Decoding is strict: the input must hold exactly one value.

use std::io::Cursor;

use aufs_types::constants::MAX_PAYLOAD_SIZE;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{DecodeError, EncodeError};
use crate::payload::PurchaseOrder;

// =============================================================================
// Generic Payloads
// =============================================================================

/// Encode a payload to CBOR.
pub fn encode_payload<T: Serialize>(payload: &T) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    ciborium::into_writer(payload, &mut buf)?;

    if buf.len() > MAX_PAYLOAD_SIZE {
        return Err(EncodeError::PayloadTooLarge {
            size: buf.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }

    Ok(buf)
}

/// Decode a CBOR payload.
pub fn decode_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    if bytes.len() > MAX_PAYLOAD_SIZE {
        return Err(DecodeError::PayloadTooLarge {
            size: bytes.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let mut cursor = Cursor::new(bytes);
    let value = ciborium::from_reader(&mut cursor)?;

    let consumed = cursor.position() as usize;
    if consumed != bytes.len() {
        return Err(DecodeError::TrailingBytes(bytes.len() - consumed));
    }
    Ok(value)
}

// =============================================================================
// Purchase Orders
// =============================================================================

/// Encode a purchase order.
///
/// # Example
/// ```
/// use aufs_crypto::Principal;
/// use aufs_wire::{decode_purchase_order, encode_purchase_order, PurchaseOrder};
///
/// let order = PurchaseOrder::new("/Web3Tube/dir1/movie1.mp4", Principal([1; 20]), 300);
/// let bytes = encode_purchase_order(&order).unwrap();
/// assert_eq!(decode_purchase_order(&bytes).unwrap(), order);
/// ```
pub fn encode_purchase_order(order: &PurchaseOrder) -> Result<Vec<u8>, EncodeError> {
    encode_payload(order)
}

/// Decode a purchase order.
pub fn decode_purchase_order(bytes: &[u8]) -> Result<PurchaseOrder, DecodeError> {
    decode_payload(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aufs_crypto::Principal;

    fn order() -> PurchaseOrder {
        PurchaseOrder::new("/Web3Tube/dir1/movie1.mp4", Principal([0x11; 20]), 300)
    }

    #[test]
    fn test_order_roundtrip() {
        let bytes = encode_purchase_order(&order()).unwrap();
        assert_eq!(decode_purchase_order(&bytes).unwrap(), order());
    }

    #[test]
    fn test_beneficiary_encoded_as_bytes() {
        let bytes = encode_purchase_order(&order()).unwrap();
        // 20-byte byte string header (major type 2, length 20)
        let header = [0x54u8];
        let needle: Vec<u8> = header.iter().copied().chain([0x11; 20]).collect();
        assert!(bytes.windows(needle.len()).any(|w| w == needle.as_slice()));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(decode_purchase_order(&[]), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_garbage_rejected() {
        let result = decode_purchase_order(&[0xff, 0x00, 0x13]);
        assert!(matches!(result, Err(DecodeError::PayloadDecodeFailed(_))));
    }

    #[test]
    fn test_oversized_rejected() {
        let big = vec![0u8; MAX_PAYLOAD_SIZE + 1];
        assert!(matches!(
            decode_purchase_order(&big),
            Err(DecodeError::PayloadTooLarge { .. })
        ));

        let long_path = PurchaseOrder::new("/".repeat(MAX_PAYLOAD_SIZE), Principal([0; 20]), 1);
        assert!(matches!(
            encode_purchase_order(&long_path),
            Err(EncodeError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = encode_purchase_order(&order()).unwrap();
        bytes.push(0x00);
        assert!(matches!(
            decode_purchase_order(&bytes),
            Err(DecodeError::TrailingBytes(1))
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        #[derive(serde::Serialize)]
        struct Extended {
            path: String,
            beneficiary: Principal,
            duration_secs: u32,
            refund_to: u32,
        }
        let bytes = encode_payload(&Extended {
            path: "/a".into(),
            beneficiary: Principal([1; 20]),
            duration_secs: 1,
            refund_to: 7,
        })
        .unwrap();
        assert!(decode_purchase_order(&bytes).is_err());
    }

    #[test]
    fn test_duration_out_of_range_rejected() {
        #[derive(serde::Serialize)]
        struct Wide {
            path: String,
            beneficiary: Principal,
            duration_secs: u64,
        }
        let bytes = encode_payload(&Wide {
            path: "/a".into(),
            beneficiary: Principal([1; 20]),
            duration_secs: u64::from(u32::MAX) + 1,
        })
        .unwrap();
        assert!(decode_purchase_order(&bytes).is_err());
    }
}
