//! The decoded, typed value carried by a [`crate::primitive::Primitive`] or an
//! [`crate::any::Any`]. This is the "decoded value" half of `spec.md`'s Atom:
//! a type-tagged union over every primitive domain in §4.2's type table.

use bitvec::prelude::*;
use chrono::{DateTime, FixedOffset};
use num_bigint::BigInt;

/// A decoded or to-be-encoded primitive value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(BigInt),
    /// Payload bits plus their exact bit length (trailing padding bits in
    /// the backing `BitVec` beyond `len()` are not meaningful).
    BitString(BitVec<u8, Msb0>),
    OctetString(Vec<u8>),
    Null,
    ObjectId(Vec<u32>),
    RelativeOid(Vec<u32>),
    Enumerated(i64),
    Utf8String(String),
    NumericString(String),
    PrintableString(String),
    IA5String(String),
    VisibleString(String),
    /// UTF-16BE code units, one per `char` in the BMP.
    BmpString(Vec<u16>),
    /// UTF-32BE code points.
    UniversalString(Vec<char>),
    UtcTime(DateTime<FixedOffset>),
    GeneralizedTime(DateTime<FixedOffset>),
}

impl Value {
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_bit_string(&self) -> Option<&BitSlice<u8, Msb0>> {
        match self {
            Value::BitString(b) => Some(b.as_bitslice()),
            _ => None,
        }
    }

    pub fn as_octet_string(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<&[u32]> {
        match self {
            Value::ObjectId(arcs) | Value::RelativeOid(arcs) => Some(arcs),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8String(s)
            | Value::NumericString(s)
            | Value::PrintableString(s)
            | Value::IA5String(s)
            | Value::VisibleString(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enumerated(&self) -> Option<i64> {
        match self {
            Value::Enumerated(v) => Some(*v),
            _ => None,
        }
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::BitString(b) => write!(f, "BIT STRING ({} bits)", b.len()),
            Value::OctetString(b) => write!(f, "{}", hex_string(b)),
            Value::Null => write!(f, "NULL"),
            Value::ObjectId(arcs) | Value::RelativeOid(arcs) => write!(f, "{}", dotted(arcs)),
            Value::Enumerated(v) => write!(f, "{v}"),
            Value::Utf8String(s)
            | Value::NumericString(s)
            | Value::PrintableString(s)
            | Value::IA5String(s)
            | Value::VisibleString(s) => write!(f, "{s}"),
            Value::BmpString(units) => {
                write!(f, "{}", String::from_utf16_lossy(units))
            }
            Value::UniversalString(chars) => {
                write!(f, "{}", chars.iter().collect::<String>())
            }
            Value::UtcTime(t) | Value::GeneralizedTime(t) => write!(f, "{t}"),
        }
    }
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn dotted(arcs: &[u32]) -> String {
    arcs.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(".")
}
