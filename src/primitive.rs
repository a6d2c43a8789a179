//! The "Atom": a primitive type instance, pairing a [`Kind`] with an
//! optional [`Value`] and the common tagging/optional/default flags of
//! `spec.md` §3.

use crate::ber;
use crate::codec::Codec;
use crate::error::{DecodeError, EncodeError};
use crate::tag::Identifier;
use crate::tagging::Options;
use crate::types::Kind;
use crate::value::Value;

/// A single primitive ASN.1 value (BOOLEAN, INTEGER, OCTET STRING, ...).
#[derive(Debug, Clone)]
pub struct Primitive {
    pub kind: Kind,
    pub options: Options,
    value: Option<Value>,
}

impl Primitive {
    /// A DEFAULT element starts out holding its default value
    /// (`spec.md` §3's `has_value?`/`default_value?` flags imply the value
    /// is always populated once a default is declared, not left `None`
    /// until an explicit assignment).
    pub fn new(kind: Kind, options: Options) -> Self {
        let value = options.default.clone();
        Self {
            kind,
            options,
            value,
        }
    }

    pub fn with_value(kind: Kind, options: Options, value: Value) -> Self {
        Self {
            kind,
            options,
            value: Some(value),
        }
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Assigns a value, validating it against the type's domain immediately
    /// (`spec.md` §7: "a declared constraint predicate ... rejected a value
    /// on set").
    pub fn set_value(&mut self, value: Value) -> Result<(), EncodeError> {
        self.kind.validate(&value)?;
        self.value = Some(value);
        Ok(())
    }

    pub fn identifier(&self) -> Identifier {
        self.options
            .effective_identifier(self.kind.default_tag(), false)
    }

    pub fn is_default(&self) -> bool {
        matches!((&self.value, &self.options.default), (Some(v), Some(d)) if v == d)
    }

    /// Encodes this atom, honoring OPTIONAL/DEFAULT elision and explicit
    /// tagging (`spec.md` §3, §4.4).
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        if self.value.is_none() {
            return if self.options.optional {
                Ok(Vec::new())
            } else {
                Err(EncodeError::Constraint {
                    name: self.options.name.clone(),
                    reason: "no value set for required element".into(),
                })
            };
        }

        if self.is_default() {
            return Ok(Vec::new());
        }

        let value = self.value.as_ref().expect("checked above");
        let content = self
            .kind
            .encode_content(value)
            .map_err(|e| match &self.options.name {
                Some(name) => e.named(name.clone()),
                None => e,
            })?;

        let mut out = Vec::new();
        match self.options.tagging {
            crate::tagging::Tagging::Explicit(number) => {
                let inner_identifier = Identifier::from_tag(self.kind.default_tag(), false);
                let mut inner = Vec::new();
                ber::encode_tlv(inner_identifier, &content, &mut inner);
                let outer = self.options.effective_identifier(self.kind.default_tag(), false);
                ber::encode_tlv(outer, &inner, &mut out);
            }
            _ => {
                let identifier = self.identifier();
                ber::encode_tlv(identifier, &content, &mut out);
            }
        }
        Ok(out)
    }

    /// Attempts to decode this atom from the front of `input`. Returns the
    /// number of bytes consumed (zero if OPTIONAL/DEFAULT elision applied).
    pub fn decode(&mut self, input: &[u8], codec: Codec) -> Result<usize, DecodeError> {
        let expected = self.identifier();

        let upcoming = match ber::peek_identifier(input) {
            Ok(id) => id,
            Err(e) => return self.elide_or_fail(e),
        };

        if upcoming != expected {
            return self.elide_or_fail(DecodeError::Encoding {
                reason: format!(
                    "expected identifier {expected:?}, found {upcoming:?}"
                ),
            });
        }

        let tlv = ber::read_tlv(input, codec)?;

        let content = match self.options.tagging {
            crate::tagging::Tagging::Explicit(_) => {
                let inner = ber::read_tlv(tlv.content, codec)?;
                if inner.consumed != tlv.content.len() {
                    return Err(DecodeError::Encoding {
                        reason: "explicit wrapper content has trailing bytes".into(),
                    });
                }
                inner.content
            }
            _ => tlv.content,
        };

        let value = self
            .kind
            .decode_content(content, codec)
            .map_err(|e| match &self.options.name {
                Some(name) => e.named(name.clone()),
                None => e,
            })?;
        self.value = Some(value);
        Ok(tlv.consumed)
    }

    fn elide_or_fail(&mut self, error: DecodeError) -> Result<usize, DecodeError> {
        if let Some(default) = self.options.default.clone() {
            self.value = Some(default);
            crate::tracer::record(crate::tracer::Event::Elided {
                name: self.options.name.as_deref(),
            });
            return Ok(0);
        }
        if self.options.optional {
            self.value = None;
            crate::tracer::record(crate::tracer::Event::Elided {
                name: self.options.name.as_deref(),
            });
            return Ok(0);
        }
        Err(match &self.options.name {
            Some(name) => error.named(name.clone()),
            None => error,
        })
    }
}

