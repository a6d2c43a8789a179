//! BIT STRING (universal tag 3): an "unused bits" octet followed by the
//! payload, trailing unused bits zeroed.

use bitvec::prelude::*;

/// Encodes `(bytes, bit_length)` into content octets: one leading "unused
/// bits count" octet, then the payload with any trailing unused bits forced
/// to zero.
pub fn encode(bits: &BitSlice<u8, Msb0>) -> Vec<u8> {
    let bit_len = bits.len();
    let byte_len = bit_len.div_ceil(8);
    let unused = (byte_len * 8 - bit_len) as u8;

    let mut payload: BitVec<u8, Msb0> = BitVec::with_capacity(byte_len * 8);
    payload.extend_from_bitslice(bits);
    payload.resize(byte_len * 8, false);

    let mut out = Vec::with_capacity(1 + byte_len);
    out.push(unused);
    out.extend(payload.into_vec());
    out
}

/// Decodes content octets into a bit string, trimmed to its declared bit
/// length.
pub fn decode(content: &[u8]) -> Result<BitVec<u8, Msb0>, String> {
    let &[unused, ref payload @ ..] = content else {
        return Err("BIT STRING content must contain at least the unused-bits octet".into());
    };
    if unused > 7 {
        return Err(format!("unused-bits octet {unused} out of range 0..=7"));
    }
    if unused > 0 && payload.is_empty() {
        return Err("non-zero unused-bits octet with no payload".into());
    }

    let mut bits: BitVec<u8, Msb0> = BitVec::from_slice(payload);
    let bit_len = bits.len() - unused as usize;
    bits.truncate(bit_len);
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_spec_scenario() {
        // value "NOP" (3 bytes) with bit_length 20 -> 04 4E 4F 50
        let mut bits: BitVec<u8, Msb0> = BitVec::from_slice(b"NOP");
        bits.truncate(20);
        assert_eq!(encode(&bits), vec![0x04, 0x4e, 0x4f, 0x50]);
    }

    #[test]
    fn round_trips() {
        let mut bits: BitVec<u8, Msb0> = BitVec::from_slice(&[0x01, 0x04, 0x06]);
        bits.truncate(23);
        let encoded = encode(&bits);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, bits);
    }

    #[test]
    fn empty_bit_string_round_trips() {
        let bits: BitVec<u8, Msb0> = BitVec::new();
        let encoded = encode(&bits);
        assert_eq!(encoded, vec![0x00]);
        assert_eq!(decode(&encoded).unwrap(), bits);
    }

    #[test]
    fn rejects_out_of_range_unused_count() {
        assert!(decode(&[0x08, 0xff]).is_err());
    }
}
