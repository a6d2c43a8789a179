//! SEQUENCE / SET and SEQUENCE OF / SET OF (`spec.md` §4.3).

use crate::ber;
use crate::codec::Codec;
use crate::element::Element;
use crate::error::{DecodeError, EncodeError};
use crate::tag::{Identifier, Tag};
use crate::tagging::Options;

/// One named child of a SEQUENCE/SET, in declaration order.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub element: Element,
}

/// Whether a [`Constructed`] is framed as SEQUENCE or SET. The two share
/// every behavior except their default universal tag number; SET's
/// declaration-order preservation (rather than DER's canonical
/// sorted-by-tag SET encoding) is a deliberate resolution of the Open
/// Question in `spec.md` §9 — see `DESIGN.md`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructedKind {
    Sequence,
    Set,
}

impl ConstructedKind {
    fn default_tag(self) -> Tag {
        match self {
            ConstructedKind::Sequence => Tag::SEQUENCE,
            ConstructedKind::Set => Tag::SET,
        }
    }
}

/// The value state of a [`Constructed`] node: either its children are
/// individually tracked, or (supporting two-pass parsing, `spec.md` §9) its
/// value has been overwritten with an opaque raw byte string that passes
/// through encode/decode unparsed.
#[derive(Debug, Clone)]
enum Body {
    Fields(Vec<Field>),
    Raw(Vec<u8>),
}

/// A SEQUENCE or SET: an ordered list of named child elements, or (when
/// [`Constructed::set_raw`] has been used) an opaque content slice.
#[derive(Debug, Clone)]
pub struct Constructed {
    pub kind: ConstructedKind,
    pub options: Options,
    body: Body,
}

impl Constructed {
    pub fn new(kind: ConstructedKind, options: Options, fields: Vec<Field>) -> Self {
        Self {
            kind,
            options,
            body: Body::Fields(fields),
        }
    }

    pub fn identifier(&self) -> Identifier {
        self.options
            .effective_identifier(self.kind.default_tag(), true)
    }

    pub fn fields(&self) -> Option<&[Field]> {
        match &self.body {
            Body::Fields(fields) => Some(fields),
            Body::Raw(_) => None,
        }
    }

    pub fn fields_mut(&mut self) -> Option<&mut Vec<Field>> {
        match &mut self.body {
            Body::Fields(fields) => Some(fields),
            Body::Raw(_) => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Element> {
        self.fields()?.iter().find(|f| f.name == name).map(|f| &f.element)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.fields_mut()?
            .iter_mut()
            .find(|f| f.name == name)
            .map(|f| &mut f.element)
    }

    pub fn get_index(&self, index: usize) -> Option<&Element> {
        self.fields()?.get(index).map(|f| &f.element)
    }

    /// Overwrites this node's value with a raw, not-yet-parsed byte string
    /// (the "Sequence whose value is set to a raw byte string passes
    /// through unparsed" API of `spec.md` §4.3/§9).
    pub fn set_raw(&mut self, bytes: Vec<u8>) {
        self.body = Body::Raw(bytes);
    }

    pub fn raw(&self) -> Option<&[u8]> {
        match &self.body {
            Body::Raw(bytes) => Some(bytes),
            Body::Fields(_) => None,
        }
    }

    pub fn has_value(&self) -> bool {
        match &self.body {
            Body::Raw(_) => true,
            Body::Fields(fields) => !fields.is_empty(),
        }
    }

    /// Sorts fields by their encoded identifier, the DER-canonical SET OF
    /// ordering. Opt-in only (`spec.md` §9 Open Question resolution): plain
    /// encode/decode preserve declaration order.
    pub fn sort_der(&mut self) -> Result<(), EncodeError> {
        let Body::Fields(fields) = &mut self.body else {
            return Ok(());
        };
        let mut keyed = Vec::with_capacity(fields.len());
        for field in fields.drain(..) {
            let encoded = field.element.encode()?;
            keyed.push((encoded, field));
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        *fields = keyed.into_iter().map(|(_, field)| field).collect();
        Ok(())
    }

    /// Concatenates each child's full encoding in order (or emits the raw
    /// passthrough bytes) and frames it with this node's own identifier.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let content = match &self.body {
            Body::Raw(bytes) => bytes.clone(),
            Body::Fields(fields) => {
                let mut content = Vec::new();
                for field in fields {
                    let encoded = field.element.encode().map_err(|e| e.named(field.name.clone()))?;
                    content.extend(encoded);
                }
                content
            }
        };
        let mut out = Vec::new();
        ber::encode_tlv(self.identifier(), &content, &mut out);
        Ok(out)
    }

    /// Reads this node's TLV unit, then advances a cursor through the
    /// content slice, giving each child the remaining bytes in turn.
    /// Children decide whether to consume zero bytes (OPTIONAL/DEFAULT) or
    /// raise.
    pub fn decode(&mut self, input: &[u8], codec: Codec) -> Result<usize, DecodeError> {
        let expected = self.identifier();
        let upcoming = ber::peek_identifier(input).ok();
        if upcoming != Some(expected) {
            return self.elide_or_fail_missing();
        }

        let tlv = ber::read_tlv(input, codec)?;
        let Body::Fields(fields) = &mut self.body else {
            // A previous `set_raw` call opted this node out of structured
            // parsing entirely; honor it by keeping the raw bytes.
            self.body = Body::Raw(tlv.content.to_vec());
            return Ok(tlv.consumed);
        };

        let mut cursor = tlv.content;
        for field in fields.iter_mut() {
            let consumed = field
                .element
                .decode(cursor, codec)
                .map_err(|e| e.named(field.name.clone()))?;
            cursor = &cursor[consumed..];
        }
        if !cursor.is_empty() {
            return Err(DecodeError::Encoding {
                reason: format!(
                    "{} bytes unconsumed after decoding all declared fields",
                    cursor.len()
                ),
            });
        }
        Ok(tlv.consumed)
    }

    fn elide_or_fail_missing(&mut self) -> Result<usize, DecodeError> {
        if self.options.optional {
            crate::tracer::record(crate::tracer::Event::Elided {
                name: self.options.name.as_deref(),
            });
            return Ok(0);
        }
        Err(DecodeError::Encoding {
            reason: format!(
                "expected identifier {:?} for {:?}",
                self.identifier(),
                self.options.name
            ),
        })
    }
}

/// A constructor for one fresh, valueless element, used by
/// [`Repeated`] to materialize each SEQUENCE OF/SET OF member
/// (`spec.md` §4.3: "the prototype is either a type class, a concrete type
/// instance ... or a model class").
pub type Prototype = std::rc::Rc<dyn Fn() -> Element>;

/// SEQUENCE OF / SET OF: a single prototype and a homogeneous array.
#[derive(Clone)]
pub struct Repeated {
    pub is_set_of: bool,
    pub options: Options,
    prototype: Prototype,
    elements: Vec<Element>,
}

impl std::fmt::Debug for Repeated {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repeated")
            .field("is_set_of", &self.is_set_of)
            .field("options", &self.options)
            .field("elements", &self.elements)
            .finish()
    }
}

impl Repeated {
    pub fn new(is_set_of: bool, options: Options, prototype: Prototype) -> Self {
        Self {
            is_set_of,
            options,
            prototype,
            elements: Vec::new(),
        }
    }

    fn default_tag(&self) -> Tag {
        if self.is_set_of {
            Tag::SET
        } else {
            Tag::SEQUENCE
        }
    }

    pub fn identifier(&self) -> Identifier {
        self.options.effective_identifier(self.default_tag(), true)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut Vec<Element> {
        &mut self.elements
    }

    /// Appends a freshly materialized element (from the prototype) to the
    /// array and returns it for the caller to populate.
    pub fn push_new(&mut self) -> &mut Element {
        self.elements.push((self.prototype)());
        self.elements.last_mut().expect("just pushed")
    }

    pub fn has_value(&self) -> bool {
        !self.elements.is_empty()
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        if self.elements.is_empty() && self.options.optional {
            return Ok(Vec::new());
        }
        let mut content = Vec::new();
        for (index, element) in self.elements.iter().enumerate() {
            let encoded = element
                .encode()
                .map_err(|e| e.named(format!("[{index}]")))?;
            content.extend(encoded);
        }
        let mut out = Vec::new();
        ber::encode_tlv(self.identifier(), &content, &mut out);
        Ok(out)
    }

    /// Loops until the content slice is exhausted, duplicating the
    /// prototype for each element (`spec.md` §4.3).
    pub fn decode(&mut self, input: &[u8], codec: Codec) -> Result<usize, DecodeError> {
        let expected = self.identifier();
        let upcoming = ber::peek_identifier(input).ok();
        if upcoming != Some(expected) {
            if self.options.optional {
                return Ok(0);
            }
            return Err(DecodeError::Encoding {
                reason: format!("expected identifier {expected:?}"),
            });
        }

        let tlv = ber::read_tlv(input, codec)?;
        self.elements.clear();
        let mut cursor = tlv.content;
        let mut index = 0;
        while !cursor.is_empty() {
            let mut element = (self.prototype)();
            let consumed = element
                .decode(cursor, codec)
                .map_err(|e| e.named(format!("[{index}]")))?;
            if consumed == 0 {
                return Err(DecodeError::Encoding {
                    reason: "element prototype consumed zero bytes; would loop forever".into(),
                });
            }
            cursor = &cursor[consumed..];
            self.elements.push(element);
            index += 1;
        }
        Ok(tlv.consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::primitive::Primitive;
    use crate::types::Kind;
    use crate::value::Value;

    #[test]
    fn sequence_round_trips_spec_scenario() {
        // SEQUENCE { BOOLEAN(false), INTEGER(42), BIT STRING } ->
        // 30 0C 01 01 00 02 01 2A 03 04 01 01 04 06
        let mut boolean = Primitive::new(Kind::Boolean, Options::new());
        boolean.set_value(Value::Boolean(false)).unwrap();
        let mut integer = Primitive::new(Kind::Integer { enum_table: None }, Options::new());
        integer.set_value(Value::Integer(42.into())).unwrap();
        let mut bits = Primitive::new(Kind::BitString, Options::new());
        bits.set_value(Value::BitString(crate::types::bits_from_bytes(&[0x01, 0x04, 0x06], 23)))
            .unwrap();

        let seq = Constructed::new(
            ConstructedKind::Sequence,
            Options::new(),
            vec![
                Field { name: "a".into(), element: Element::Primitive(boolean) },
                Field { name: "b".into(), element: Element::Primitive(integer) },
                Field { name: "c".into(), element: Element::Primitive(bits) },
            ],
        );

        let expected = vec![
            0x30, 0x0c, 0x01, 0x01, 0x00, 0x02, 0x01, 0x2a, 0x03, 0x04, 0x01, 0x01, 0x04, 0x06,
        ];
        assert_eq!(seq.encode().unwrap(), expected);

        let mut decoded = Constructed::new(
            ConstructedKind::Sequence,
            Options::new(),
            vec![
                Field {
                    name: "a".into(),
                    element: Element::Primitive(Primitive::new(Kind::Boolean, Options::new())),
                },
                Field {
                    name: "b".into(),
                    element: Element::Primitive(Primitive::new(
                        Kind::Integer { enum_table: None },
                        Options::new(),
                    )),
                },
                Field {
                    name: "c".into(),
                    element: Element::Primitive(Primitive::new(Kind::BitString, Options::new())),
                },
            ],
        );
        let consumed = decoded.decode(&expected, Codec::Der).unwrap();
        assert_eq!(consumed, expected.len());
    }

    #[test]
    fn sequence_of_round_trips() {
        let prototype: Prototype = std::rc::Rc::new(|| {
            Element::Primitive(Primitive::new(Kind::Integer { enum_table: None }, Options::new()))
        });
        let mut seq_of = Repeated::new(false, Options::new(), prototype);
        for v in [1, 2, 3] {
            if let Element::Primitive(p) = seq_of.push_new() {
                p.set_value(Value::Integer(v.into())).unwrap();
            }
        }
        let encoded = seq_of.encode().unwrap();

        let prototype: Prototype = std::rc::Rc::new(|| {
            Element::Primitive(Primitive::new(Kind::Integer { enum_table: None }, Options::new()))
        });
        let mut decoded = Repeated::new(false, Options::new(), prototype);
        decoded.decode(&encoded, Codec::Der).unwrap();
        assert_eq!(decoded.elements().len(), 3);
    }

    #[test]
    fn raw_sequence_passes_through_unparsed() {
        let mut seq = Constructed::new(ConstructedKind::Sequence, Options::new(), vec![]);
        seq.set_raw(vec![0x01, 0x01, 0xff]);
        let encoded = seq.encode().unwrap();
        assert_eq!(encoded, vec![0x30, 0x03, 0x01, 0x01, 0xff]);
    }
}
