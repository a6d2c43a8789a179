//! # Primitive Types (Component B)
//!
//! Each primitive ASN.1 type is described by a [`Kind`]: its universal tag
//! number, and the content encode/decode functions of `spec.md` §4.2's type
//! table. [`crate::primitive::Primitive`] (the "Atom") pairs a `Kind` with a
//! [`crate::value::Value`] and the tagging/optional/default flags common to
//! every element.

pub mod bit_string;
pub mod enumerated;
pub mod integer;
pub mod oid;
pub mod strings;
pub mod time;

pub use enumerated::EnumTable;

use bitvec::prelude::*;
use num_bigint::BigInt;

use crate::codec::Codec;
use crate::error::{DecodeError, EncodeError};
use crate::tag::Tag;
use crate::value::Value;

/// Which primitive type a [`crate::primitive::Primitive`] carries. Owns
/// the universal default tag and, for INTEGER/ENUMERATED, the optional
/// name/value table.
#[derive(Debug, Clone)]
pub enum Kind {
    Boolean,
    Integer { enum_table: Option<EnumTable> },
    BitString,
    OctetString,
    Null,
    ObjectId,
    RelativeOid,
    Enumerated { table: EnumTable },
    Utf8String,
    NumericString,
    PrintableString,
    IA5String,
    VisibleString,
    BmpString,
    UniversalString,
    UtcTime,
    GeneralizedTime,
}

impl Kind {
    /// The universal tag this type defaults to absent any tagging override.
    pub fn default_tag(&self) -> Tag {
        match self {
            Kind::Boolean => Tag::BOOLEAN,
            Kind::Integer { .. } => Tag::INTEGER,
            Kind::BitString => Tag::BIT_STRING,
            Kind::OctetString => Tag::OCTET_STRING,
            Kind::Null => Tag::NULL,
            Kind::ObjectId => Tag::OBJECT_IDENTIFIER,
            Kind::RelativeOid => Tag::RELATIVE_OID,
            Kind::Enumerated { .. } => Tag::ENUMERATED,
            Kind::Utf8String => Tag::UTF8_STRING,
            Kind::NumericString => Tag::NUMERIC_STRING,
            Kind::PrintableString => Tag::PRINTABLE_STRING,
            Kind::IA5String => Tag::IA5_STRING,
            Kind::VisibleString => Tag::VISIBLE_STRING,
            Kind::BmpString => Tag::BMP_STRING,
            Kind::UniversalString => Tag::UNIVERSAL_STRING,
            Kind::UtcTime => Tag::UTC_TIME,
            Kind::GeneralizedTime => Tag::GENERALIZED_TIME,
        }
    }

    /// A short name for diagnostics (`EnumeratedError`/`ConstraintError`
    /// messages, `Debug` output).
    pub fn type_name(&self) -> &'static str {
        match self {
            Kind::Boolean => "BOOLEAN",
            Kind::Integer { .. } => "INTEGER",
            Kind::BitString => "BIT STRING",
            Kind::OctetString => "OCTET STRING",
            Kind::Null => "NULL",
            Kind::ObjectId => "OBJECT IDENTIFIER",
            Kind::RelativeOid => "RELATIVE-OID",
            Kind::Enumerated { .. } => "ENUMERATED",
            Kind::Utf8String => "UTF8String",
            Kind::NumericString => "NumericString",
            Kind::PrintableString => "PrintableString",
            Kind::IA5String => "IA5String",
            Kind::VisibleString => "VisibleString",
            Kind::BmpString => "BMPString",
            Kind::UniversalString => "UniversalString",
            Kind::UtcTime => "UTCTime",
            Kind::GeneralizedTime => "GeneralizedTime",
        }
    }

    /// Validates `value` against this kind's domain (restricted character
    /// sets, ENUMERATED membership), without encoding it. Called on
    /// assignment as well as before encoding.
    pub fn validate(&self, value: &Value) -> Result<(), EncodeError> {
        match (self, value) {
            (Kind::NumericString, Value::NumericString(s)) => strings::validate_numeric(s)
                .map_err(|reason| EncodeError::Constraint { name: None, reason }),
            (Kind::PrintableString, Value::PrintableString(s)) => strings::validate_printable(s)
                .map_err(|reason| EncodeError::Constraint { name: None, reason }),
            (Kind::IA5String, Value::IA5String(s)) => strings::validate_ia5(s)
                .map_err(|reason| EncodeError::Constraint { name: None, reason }),
            (Kind::VisibleString, Value::VisibleString(s)) => strings::validate_visible(s)
                .map_err(|reason| EncodeError::Constraint { name: None, reason }),
            (Kind::Enumerated { table }, Value::Enumerated(v)) => {
                if table.contains_value(*v) {
                    Ok(())
                } else {
                    Err(EncodeError::Enumerated { value: *v })
                }
            }
            (Kind::Integer { enum_table: Some(table) }, Value::Integer(v)) => {
                let v: i64 = v.try_into().map_err(|_| EncodeError::Enumerated {
                    value: i64::MAX,
                })?;
                if table.contains_value(v) {
                    Ok(())
                } else {
                    Err(EncodeError::Enumerated { value: v })
                }
            }
            (Kind::ObjectId, Value::ObjectId(arcs)) => oid::validate_arcs(arcs)
                .map_err(|reason| EncodeError::Constraint { name: None, reason }),
            _ => Ok(()),
        }
    }

    /// Encodes `value`'s content octets (identifier and length are handled
    /// by the caller, typically [`crate::primitive::Primitive::encode`]).
    pub fn encode_content(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.validate(value)?;
        if let (Kind::ObjectId, Value::ObjectId(arcs)) = (self, value) {
            return oid::encode(arcs).map_err(|reason| EncodeError::Constraint { name: None, reason });
        }
        if let (Kind::RelativeOid, Value::RelativeOid(arcs)) = (self, value) {
            return oid::encode_relative(arcs)
                .map_err(|reason| EncodeError::Constraint { name: None, reason });
        }
        Ok(match (self, value) {
            (Kind::Boolean, Value::Boolean(b)) => vec![if *b { 0xff } else { 0x00 }],
            (Kind::Integer { .. }, Value::Integer(i)) => integer::encode(i),
            (Kind::BitString, Value::BitString(bits)) => bit_string::encode(bits),
            (Kind::OctetString, Value::OctetString(bytes)) => bytes.clone(),
            (Kind::Null, Value::Null) => Vec::new(),
            (Kind::Enumerated { .. }, Value::Enumerated(v)) => integer::encode(&BigInt::from(*v)),
            (Kind::Utf8String, Value::Utf8String(s)) => s.as_bytes().to_vec(),
            (Kind::NumericString, Value::NumericString(s)) => s.as_bytes().to_vec(),
            (Kind::PrintableString, Value::PrintableString(s)) => s.as_bytes().to_vec(),
            (Kind::IA5String, Value::IA5String(s)) => s.as_bytes().to_vec(),
            (Kind::VisibleString, Value::VisibleString(s)) => s.as_bytes().to_vec(),
            (Kind::BmpString, Value::BmpString(units)) => strings::encode_bmp(units),
            (Kind::UniversalString, Value::UniversalString(chars)) => {
                strings::encode_universal(chars)
            }
            (Kind::UtcTime, Value::UtcTime(t)) => time::encode_utc(t).into_bytes(),
            (Kind::GeneralizedTime, Value::GeneralizedTime(t)) => {
                time::encode_generalized(t).into_bytes()
            }
            _ => {
                return Err(EncodeError::Constraint {
                    name: None,
                    reason: format!(
                        "value does not match declared type {}",
                        self.type_name()
                    ),
                })
            }
        })
    }

    /// Decodes content octets into a [`Value`] of this kind, validating
    /// domain constraints. Under [`Codec::Der`], BOOLEAN content is
    /// restricted to exactly `0x00`/`0xFF` and INTEGER content must be
    /// minimal-length (`spec.md` §8 "Integer minimality").
    pub fn decode_content(&self, content: &[u8], codec: Codec) -> Result<Value, DecodeError> {
        let tag = self.default_tag();
        let malformed = |reason: String| DecodeError::MalformedContent { tag, reason };

        let value = match self {
            Kind::Boolean => {
                let &[byte] = content else {
                    return Err(malformed("BOOLEAN content must be exactly one octet".into()));
                };
                if codec.is_der() && byte != 0x00 && byte != 0xff {
                    return Err(malformed(format!(
                        "DER BOOLEAN content must be 0x00 or 0xff, got {byte:#04x}"
                    )));
                }
                Value::Boolean(byte != 0x00)
            }
            Kind::Integer { .. } => {
                if codec.is_der() && integer::has_redundant_leading_octet(content) {
                    return Err(malformed("INTEGER content is not minimal-length".into()));
                }
                Value::Integer(integer::decode(content).map_err(malformed)?)
            }
            Kind::BitString => Value::BitString(bit_string::decode(content).map_err(malformed)?),
            Kind::OctetString => Value::OctetString(content.to_vec()),
            Kind::Null => {
                if !content.is_empty() {
                    return Err(malformed("NULL must have empty content".into()));
                }
                Value::Null
            }
            Kind::ObjectId => Value::ObjectId(oid::decode(content).map_err(malformed)?),
            Kind::RelativeOid => {
                Value::RelativeOid(oid::decode_relative(content).map_err(malformed)?)
            }
            Kind::Enumerated { table } => {
                let v = integer::decode(content).map_err(malformed)?;
                let v: i64 = (&v).try_into().map_err(|_| DecodeError::Enumerated {
                    value: i64::MAX,
                })?;
                if !table.contains_value(v) {
                    return Err(DecodeError::Enumerated { value: v });
                }
                Value::Enumerated(v)
            }
            Kind::Utf8String => {
                Value::Utf8String(String::from_utf8(content.to_vec()).map_err(|e| malformed(e.to_string()))?)
            }
            Kind::NumericString => {
                let s = ascii_string(content).map_err(malformed)?;
                strings::validate_numeric(&s)
                    .map_err(|reason| DecodeError::Constraint { name: None, reason })?;
                Value::NumericString(s)
            }
            Kind::PrintableString => {
                let s = ascii_string(content).map_err(malformed)?;
                strings::validate_printable(&s)
                    .map_err(|reason| DecodeError::Constraint { name: None, reason })?;
                Value::PrintableString(s)
            }
            Kind::IA5String => {
                let s = ascii_string(content).map_err(malformed)?;
                strings::validate_ia5(&s)
                    .map_err(|reason| DecodeError::Constraint { name: None, reason })?;
                Value::IA5String(s)
            }
            Kind::VisibleString => {
                let s = ascii_string(content).map_err(malformed)?;
                strings::validate_visible(&s)
                    .map_err(|reason| DecodeError::Constraint { name: None, reason })?;
                Value::VisibleString(s)
            }
            Kind::BmpString => Value::BmpString(strings::decode_bmp(content).map_err(malformed)?),
            Kind::UniversalString => {
                Value::UniversalString(strings::decode_universal(content).map_err(malformed)?)
            }
            Kind::UtcTime => {
                let s = ascii_string(content).map_err(malformed)?;
                Value::UtcTime(time::decode_utc(&s).map_err(malformed)?)
            }
            Kind::GeneralizedTime => {
                let s = ascii_string(content).map_err(malformed)?;
                Value::GeneralizedTime(time::decode_generalized(&s).map_err(malformed)?)
            }
        };
        Ok(value)
    }
}

fn ascii_string(content: &[u8]) -> Result<String, String> {
    if !content.is_ascii() {
        return Err("content is not valid US-ASCII".into());
    }
    Ok(String::from_utf8(content.to_vec()).expect("ASCII is always valid UTF-8"))
}

/// A raw, untyped bit sequence helper for building [`Value::BitString`]
/// values from a byte slice and an explicit bit length, matching the
/// `(bytes, bit_length)` domain description in `spec.md` §4.2.
pub fn bits_from_bytes(bytes: &[u8], bit_length: usize) -> BitVec<u8, Msb0> {
    let mut bits: BitVec<u8, Msb0> = BitVec::from_slice(bytes);
    bits.truncate(bit_length);
    bits
}
