//! # TLV codec (Component A)
//!
//! Bit-exact serialization and parsing of the identifier and length octets
//! shared by BER and DER (`spec.md` §4.1). Callers never see framing octets:
//! [`read_tlv`] hands back the identifier, the content slice, and the total
//! number of bytes the TLV unit occupied in the input.

use snafu::OptionExt;

use crate::codec::Codec;
use crate::error::{DecodeError, EncodingSnafu};
use crate::tag::{Class, Identifier, Tag};

const INDEFINITE_LENGTH: u8 = 0x80;
const END_OF_CONTENTS: [u8; 2] = [0, 0];

/// Appends the identifier octet(s) for `identifier` to `out`.
///
/// Short-form tag numbers (`<= 30`) are a single octet; long-form tag
/// numbers are `class | pc | 0x1f` followed by base-128 big-endian octets,
/// high bit set on every octet but the last.
pub fn encode_identifier(identifier: Identifier, out: &mut Vec<u8>) {
    let Identifier {
        tag: Tag { class, value },
        constructed,
    } = identifier;

    let mut first = (class as u8) << 6;
    if constructed {
        first |= 0x20;
    }

    if value <= 30 {
        out.push(first | value as u8);
    } else {
        out.push(first | 0x1f);
        encode_base128(value, out);
    }
}

fn encode_base128(mut value: u32, out: &mut Vec<u8>) {
    let mut stack = Vec::new();
    stack.push((value & 0x7f) as u8);
    value >>= 7;
    while value != 0 {
        stack.push(((value & 0x7f) as u8) | 0x80);
        value >>= 7;
    }
    out.extend(stack.into_iter().rev());
}

/// Decodes one identifier from the front of `input`, returning the
/// identifier and the number of octets it occupied.
pub fn decode_identifier(input: &[u8]) -> Result<(Identifier, usize), DecodeError> {
    let &first = input.first().context(EncodingSnafu {
        reason: "unexpected end of input while reading identifier octet",
    })?;

    let class = Class::from_u8(first >> 6).expect("two-bit value always maps to a Class");
    let constructed = first & 0x20 != 0;
    let low5 = first & 0x1f;

    if low5 != 0x1f {
        return Ok((Identifier::new(class, constructed, low5 as u32), 1));
    }

    let mut value: u32 = 0;
    let mut consumed = 1;
    loop {
        let &byte = input.get(consumed).context(EncodingSnafu {
            reason: "truncated multi-byte tag number",
        })?;
        value = value
            .checked_shl(7)
            .and_then(|v| v.checked_add((byte & 0x7f) as u32))
            .context(EncodingSnafu {
                reason: "tag number overflowed 32 bits",
            })?;
        consumed += 1;
        if byte & 0x80 == 0 {
            break;
        }
    }

    Ok((Identifier::new(class, constructed, value), consumed))
}

/// Appends the minimal-length definite-form length octets for `size`.
pub fn encode_length(size: usize, out: &mut Vec<u8>) {
    if size < 128 {
        out.push(size as u8);
        return;
    }

    let mut bytes = Vec::new();
    let mut remaining = size;
    while remaining != 0 {
        bytes.push((remaining & 0xff) as u8);
        remaining >>= 8;
    }
    bytes.reverse();

    out.push(0x80 | bytes.len() as u8);
    out.extend(bytes);
}

/// The outcome of decoding a length field.
pub enum Length {
    Definite(usize),
    /// `0x80`: the indefinite-length marker. Detected, never decoded
    /// (`spec.md` §1 Non-goals).
    Indefinite,
}

/// Decodes one length field from the front of `input`, returning the
/// length and the number of octets the length field itself occupied.
pub fn decode_length(input: &[u8]) -> Result<(Length, usize), DecodeError> {
    let &first = input.first().context(EncodingSnafu {
        reason: "unexpected end of input while reading length octet",
    })?;

    if first == INDEFINITE_LENGTH {
        return Ok((Length::Indefinite, 1));
    }

    if first < 0x80 {
        return Ok((Length::Definite(first as usize), 1));
    }

    let octet_count = (first & 0x7f) as usize;
    let bytes = input.get(1..1 + octet_count).context(EncodingSnafu {
        reason: "truncated long-form length",
    })?;

    let mut value: usize = 0;
    for &b in bytes {
        value = value
            .checked_shl(8)
            .and_then(|v| v.checked_add(b as usize))
            .context(EncodingSnafu {
                reason: "length value overflowed platform word size",
            })?;
    }

    Ok((Length::Definite(value), 1 + octet_count))
}

/// One fully-framed TLV unit: its identifier, the slice of content bytes
/// (never including identifier/length octets), and the total number of
/// input bytes it occupied.
pub struct Tlv<'a> {
    pub identifier: Identifier,
    pub content: &'a [u8],
    pub consumed: usize,
}

/// Reads one complete TLV unit from the front of `input` under `codec`.
///
/// Rejects indefinite length under DER with
/// [`DecodeError::IndefiniteLengthUnderDer`]; under BER, indefinite length is
/// detected but not decoded, and surfaces as [`DecodeError::NotImplemented`].
pub fn read_tlv(input: &[u8], codec: Codec) -> Result<Tlv<'_>, DecodeError> {
    let (identifier, id_len) = decode_identifier(input)?;
    let (length, len_len) = decode_length(&input[id_len..])?;

    let size = match length {
        Length::Definite(size) => size,
        Length::Indefinite if codec.is_der() => {
            return Err(DecodeError::IndefiniteLengthUnderDer)
        }
        Length::Indefinite => return Err(DecodeError::NotImplemented),
    };

    let header_len = id_len + len_len;
    let content = input
        .get(header_len..header_len + size)
        .ok_or_else(|| DecodeError::Encoding {
            reason: format!(
                "declared content length {size} exceeds remaining input ({} bytes)",
                input.len().saturating_sub(header_len)
            ),
        })?;

    crate::tracer::record(crate::tracer::Event::TlvRead {
        identifier,
        content_len: content.len(),
        codec,
    });
    tracing::trace!(
        class = ?identifier.class(),
        number = identifier.number(),
        constructed = identifier.constructed,
        content_len = content.len(),
        %codec,
        "read TLV unit"
    );

    Ok(Tlv {
        identifier,
        content,
        consumed: header_len + size,
    })
}

/// Peeks the identifier of the next TLV unit without consuming anything,
/// used by CHOICE alternative matching and OPTIONAL/DEFAULT elision
/// decisions.
pub fn peek_identifier(input: &[u8]) -> Result<Identifier, DecodeError> {
    decode_identifier(input).map(|(identifier, _)| identifier)
}

/// Encodes a full TLV unit: identifier octets, definite-length octets, then
/// `content` verbatim.
pub fn encode_tlv(identifier: Identifier, content: &[u8], out: &mut Vec<u8>) {
    encode_identifier(identifier, out);
    encode_length(content.len(), out);
    out.extend_from_slice(content);
}

/// Returns `true` if `input` starts with the indefinite-length end-of-
/// contents marker (two zero octets), used by a hypothetical indefinite
/// consumer; exposed for completeness of the detection requirement.
pub fn is_end_of_contents(input: &[u8]) -> bool {
    input.starts_with(&END_OF_CONTENTS)
}
