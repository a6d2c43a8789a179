//! # `Element`: the common node type (Component C)
//!
//! `spec.md` §9's Design Notes recommend exactly this shape for a schema
//! built at runtime rather than dispatched through compile-time traits:
//! "a tagged union over the element kinds, with a common
//! encode/decode/identifier surface". Every schema node — an atom, a
//! SEQUENCE/SET, a SEQUENCE OF/SET OF, a CHOICE, an ANY, a lazily
//! materialized [`crate::wrapper::Wrapper`], or a nested
//! [`crate::model::Model`] — is one `Element`.

use crate::any::Any;
use crate::choice::Choice;
use crate::codec::Codec;
use crate::constructed::{Constructed, Repeated};
use crate::error::{DecodeError, EncodeError};
use crate::model::Model;
use crate::primitive::Primitive;
use crate::tag::Identifier;
use crate::tagging::Options;
use crate::wrapper::Wrapper;

/// A single schema node. See the module documentation for the design
/// rationale.
#[derive(Debug, Clone)]
pub enum Element {
    Primitive(Primitive),
    Constructed(Constructed),
    Repeated(Repeated),
    Choice(Choice),
    Any(Any),
    Wrapper(Box<Wrapper>),
    Model(Box<Model>),
}

impl Element {
    /// This node's effective identifier, where one is statically known.
    /// A `Choice` has none until an alternative is selected; an `Any`
    /// holding arbitrary content has none at all (it accepts every
    /// identifier).
    pub fn identifier(&self) -> Option<Identifier> {
        match self {
            Element::Primitive(p) => Some(p.identifier()),
            Element::Constructed(c) => Some(c.identifier()),
            Element::Repeated(r) => Some(r.identifier()),
            Element::Choice(c) => c.identifier(),
            Element::Any(_) => None,
            Element::Wrapper(w) => w.identifier(),
            Element::Model(m) => m.identifier(),
        }
    }

    pub fn has_value(&self) -> bool {
        match self {
            Element::Primitive(p) => p.has_value(),
            Element::Constructed(c) => c.has_value(),
            Element::Repeated(r) => r.has_value(),
            Element::Choice(c) => c.has_value(),
            Element::Any(a) => a.has_value(),
            Element::Wrapper(w) => w.has_value(),
            Element::Model(m) => m.has_value(),
        }
    }

    /// The option bag this node was declared with. `Wrapper` and `Model`
    /// forward to the element they ultimately hold.
    pub fn options(&self) -> Options {
        match self {
            Element::Primitive(p) => p.options.clone(),
            Element::Constructed(c) => c.options.clone(),
            Element::Repeated(r) => r.options.clone(),
            Element::Choice(c) => c.options.clone(),
            Element::Any(a) => a.options.clone(),
            Element::Wrapper(w) => w.options(),
            Element::Model(m) => m.options(),
        }
    }

    /// The declared name of this node, if any (`spec.md` §6 `name:`).
    pub fn name(&self) -> Option<String> {
        self.options().name
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        match self {
            Element::Primitive(p) => p.encode(),
            Element::Constructed(c) => c.encode(),
            Element::Repeated(r) => r.encode(),
            Element::Choice(c) => c.encode(),
            Element::Any(a) => a.encode(),
            Element::Wrapper(w) => w.encode(),
            Element::Model(m) => m.encode(),
        }
    }

    pub fn decode(&mut self, input: &[u8], codec: Codec) -> Result<usize, DecodeError> {
        match self {
            Element::Primitive(p) => p.decode(input, codec),
            Element::Constructed(c) => c.decode(input, codec),
            Element::Repeated(r) => r.decode(input, codec),
            Element::Choice(c) => c.decode(input, codec),
            Element::Any(a) => a.decode(input, codec),
            Element::Wrapper(w) => w.decode(input, codec),
            Element::Model(m) => m.decode(input, codec),
        }
    }

    /// Convenience constructor from a full byte buffer: decodes exactly one
    /// node, returning an error if trailing bytes remain (`spec.md` §5's
    /// `parse` entry point, single-document form).
    pub fn parse(&mut self, input: &[u8], codec: Codec) -> Result<(), DecodeError> {
        let consumed = self.decode(input, codec)?;
        if consumed != input.len() {
            return Err(DecodeError::Encoding {
                reason: format!(
                    "{} trailing bytes after decoding a complete element",
                    input.len() - consumed
                ),
            });
        }
        Ok(())
    }

    /// Projects this node's value, recursively, into a tree of associative
    /// values (`spec.md` §5's `to_h`): leaves carry their [`crate::value::Value`]
    /// rendered via `Display`; SEQUENCE/SET and Model project to a
    /// name-keyed map; SEQUENCE OF/SET OF projects to a list; CHOICE
    /// projects to the single chosen alternative's projection; ANY
    /// projects to its raw hex encoding.
    pub fn to_projection(&self) -> Result<crate::projection::Projection, EncodeError> {
        crate::projection::project(self)
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Element::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_primitive_mut(&mut self) -> Option<&mut Primitive> {
        match self {
            Element::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_constructed(&self) -> Option<&Constructed> {
        match self {
            Element::Constructed(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_constructed_mut(&mut self) -> Option<&mut Constructed> {
        match self {
            Element::Constructed(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_repeated(&self) -> Option<&Repeated> {
        match self {
            Element::Repeated(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_repeated_mut(&mut self) -> Option<&mut Repeated> {
        match self {
            Element::Repeated(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&Choice> {
        match self {
            Element::Choice(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_choice_mut(&mut self) -> Option<&mut Choice> {
        match self {
            Element::Choice(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_any(&self) -> Option<&Any> {
        match self {
            Element::Any(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_any_mut(&mut self) -> Option<&mut Any> {
        match self {
            Element::Any(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Element::Model(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_model_mut(&mut self) -> Option<&mut Model> {
        match self {
            Element::Model(m) => Some(m),
            _ => None,
        }
    }
}
