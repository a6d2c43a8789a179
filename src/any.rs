//! ANY: a hole that accepts any well-formed TLV unit (`spec.md` §4.3).

use crate::ber;
use crate::codec::Codec;
use crate::element::Element;
use crate::error::{DecodeError, EncodeError};
use crate::tagging::Options;

/// What an ANY currently holds: nothing, a captured raw TLV encoding, or a
/// typed node assigned by the caller (encoding then delegates to that
/// node's own encoder, per `spec.md` §4.3).
#[derive(Debug, Clone)]
enum AnyValue {
    Raw(Vec<u8>),
    Typed(Box<Element>),
}

#[derive(Debug, Clone, Default)]
pub struct Any {
    pub options: Options,
    value: Option<AnyValue>,
}

impl Any {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            value: None,
        }
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn set_raw(&mut self, bytes: Vec<u8>) {
        self.value = Some(AnyValue::Raw(bytes));
    }

    pub fn set_typed(&mut self, element: Element) {
        self.value = Some(AnyValue::Typed(Box::new(element)));
    }

    /// The raw encoded bytes currently held, if any (a captured TLV unit or
    /// the delegated encoding of a typed node).
    pub fn raw_bytes(&self) -> Result<Option<Vec<u8>>, EncodeError> {
        match &self.value {
            None => Ok(None),
            Some(AnyValue::Raw(bytes)) => Ok(Some(bytes.clone())),
            Some(AnyValue::Typed(element)) => element.encode().map(Some),
        }
    }

    /// Encodes this ANY: stored bytes verbatim, a typed node's own
    /// encoding, or — for a non-optional, unset ANY — a NULL encoding
    /// (`spec.md` §3 "ANY / CHOICE non-elision").
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        if let Some(bytes) = self.raw_bytes()? {
            return Ok(bytes);
        }
        if self.options.optional {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        ber::encode_tlv(crate::tag::Identifier::from_tag(crate::tag::Tag::NULL, false), &[], &mut out);
        Ok(out)
    }

    /// Reads exactly one complete TLV unit and stores it verbatim.
    pub fn decode(&mut self, input: &[u8], codec: Codec) -> Result<usize, DecodeError> {
        if input.is_empty() {
            if self.options.optional {
                self.value = None;
                return Ok(0);
            }
            return Err(DecodeError::Encoding {
                reason: "unexpected end of input decoding ANY".into(),
            });
        }
        let tlv = ber::read_tlv(input, codec)?;
        self.value = Some(AnyValue::Raw(input[..tlv.consumed].to_vec()));
        Ok(tlv.consumed)
    }
}
