//! INTEGER (universal tag 2): arbitrary-precision two's-complement content.

use num_bigint::{BigInt, Sign};
use num_traits::Zero;

/// Encodes `value` as minimal-length two's complement content octets.
///
/// Zero encodes as a single `0x00` octet. A leading `0x00` is prepended for
/// positive values whose most-significant bit would otherwise read as
/// negative; no analogous leading `0xFF` is ever needed for negative values
/// because `to_signed_bytes_be` already produces the minimal two's
/// complement form.
pub fn encode(value: &BigInt) -> Vec<u8> {
    if value.is_zero() {
        return vec![0];
    }
    value.to_signed_bytes_be()
}

/// Decodes two's-complement content octets into a [`BigInt`], sign-extending
/// from the top bit of the first content byte.
pub fn decode(content: &[u8]) -> Result<BigInt, String> {
    if content.is_empty() {
        return Err("INTEGER content must not be empty".into());
    }
    Ok(BigInt::from_signed_bytes_be(content))
}

/// Returns `true` if `content` is *not* the minimal two's-complement
/// encoding of its value (a leading `0x00` or `0xFF` octet that the next
/// octet's sign bit already implies). DER requires minimality; this is used
/// to reject over-long encodings when strict mode is desired.
pub fn has_redundant_leading_octet(content: &[u8]) -> bool {
    match content {
        [0x00, second, ..] => second & 0x80 == 0,
        [0xff, second, ..] => second & 0x80 != 0,
        _ => false,
    }
}

/// Sign of the encoded value, purely for diagnostics/tests.
pub fn sign(value: &BigInt) -> Sign {
    value.sign()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_scenarios_from_spec() {
        assert_eq!(encode(&BigInt::from(-1)), vec![0xff]);
        assert_eq!(encode(&BigInt::from(65536)), vec![0x01, 0x00, 0x00]);
        assert_eq!(encode(&BigInt::from(255)), vec![0x00, 0xff]);
        assert_eq!(encode(&BigInt::from(0)), vec![0x00]);
    }

    #[test]
    fn round_trips() {
        for v in [-1i64, 0, 1, 127, 128, 255, 256, 65536, -65536, i64::MIN, i64::MAX] {
            let value = BigInt::from(v);
            let bytes = encode(&value);
            assert_eq!(decode(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn detects_redundant_leading_octets() {
        assert!(has_redundant_leading_octet(&[0x00, 0x7f]));
        assert!(!has_redundant_leading_octet(&[0x00, 0x80]));
        assert!(has_redundant_leading_octet(&[0xff, 0x80]));
        assert!(!has_redundant_leading_octet(&[0xff, 0x7f]));
    }
}
