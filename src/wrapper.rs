//! # Wrapper (Component D)
//!
//! A lazily materialized element, built from a thunk rather than a value
//! (`spec.md` §4.4/§9): the thunk runs once, on first use, which is what
//! lets a recursive schema (a model whose own field type is itself,
//! indirectly) terminate — the recursive call is deferred behind the
//! closure instead of being evaluated while the outer declaration is still
//! being built. Also carries the option-override layer described in
//! `spec.md` §6: a `Wrapper` can override `optional`/`default`/`class`/
//! `constructed` without touching the wrapped element's own tagging.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ber;
use crate::codec::Codec;
use crate::element::Element;
use crate::error::{DecodeError, EncodeError};
use crate::projection::Projection;
use crate::tag::{Class, Identifier};
use crate::tagging::{Options, Tagging};

#[derive(Clone)]
pub struct Wrapper {
    overrides: Options,
    thunk: Rc<dyn Fn() -> Element>,
    element: RefCell<Option<Element>>,
}

impl std::fmt::Debug for Wrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wrapper")
            .field("overrides", &self.overrides)
            .field("materialized", &self.element.borrow().is_some())
            .finish()
    }
}

impl Wrapper {
    pub fn new(overrides: Options, thunk: Rc<dyn Fn() -> Element>) -> Self {
        Self {
            overrides,
            thunk,
            element: RefCell::new(None),
        }
    }

    fn ensure_materialized(&self) {
        if self.element.borrow().is_none() {
            let built = (self.thunk)();
            *self.element.borrow_mut() = Some(built);
            tracing::trace!("wrapper materialized");
        }
    }

    pub fn options(&self) -> Options {
        self.overrides.clone()
    }

    /// The overridden identifier: this wrapper's `overrides` applied to the
    /// wrapped element's own identifier via the same
    /// [`Options::effective_identifier`] resolution rule `Primitive`/
    /// `Constructed` use for their own tagging — `implicit:n`/`explicit:n`
    /// replace the tag number (and default to context class), plain
    /// `class`/`constructed` overrides only relabel those bits.
    pub fn identifier(&self) -> Option<Identifier> {
        self.ensure_materialized();
        let borrowed = self.element.borrow();
        let inner_id = borrowed.as_ref().expect("materialized above").identifier()?;
        Some(self.overrides.effective_identifier(inner_id.tag, inner_id.constructed))
    }

    /// Whether the thunk has already run. Exposed for diagnostics and for
    /// tests that need to confirm deferred evaluation without forcing it.
    pub fn is_materialized(&self) -> bool {
        self.element.borrow().is_some()
    }

    pub fn has_value(&self) -> bool {
        self.ensure_materialized();
        self.element
            .borrow()
            .as_ref()
            .expect("materialized above")
            .has_value()
    }

    /// Re-frames `inner_encoded` (a complete TLV unit) under `outer`,
    /// replacing only its identifier and keeping its content untouched —
    /// the implicit-tagging relabel, and also what a plain `class`/
    /// `constructed` override (no `tagging`) needs.
    fn relabel(&self, outer: Identifier, inner_encoded: &[u8]) -> Result<Vec<u8>, EncodeError> {
        let tlv = ber::read_tlv(inner_encoded, Codec::Der).map_err(|_| EncodeError::Constraint {
            name: self.overrides.name.clone(),
            reason: "could not reframe wrapped element's encoding".into(),
        })?;
        let mut out = Vec::new();
        ber::encode_tlv(outer, tlv.content, &mut out);
        Ok(out)
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        self.ensure_materialized();
        let borrowed = self.element.borrow();
        let inner = borrowed.as_ref().expect("materialized above");
        if !inner.has_value() && (self.overrides.optional || self.overrides.default.is_some()) {
            return Ok(Vec::new());
        }

        let Some(inner_identifier) = inner.identifier() else {
            return inner.encode();
        };
        let inner_encoded = inner.encode()?;
        let outer = self
            .overrides
            .effective_identifier(inner_identifier.tag, inner_identifier.constructed);

        if let Tagging::Explicit(_) = self.overrides.tagging {
            let mut out = Vec::new();
            ber::encode_tlv(outer, &inner_encoded, &mut out);
            return Ok(out);
        }

        if outer == inner_identifier {
            return Ok(inner_encoded);
        }
        self.relabel(outer, &inner_encoded)
    }

    pub fn decode(&mut self, input: &[u8], codec: Codec) -> Result<usize, DecodeError> {
        self.ensure_materialized();
        let expected = self.identifier();
        let upcoming = if input.is_empty() {
            None
        } else {
            ber::peek_identifier(input).ok()
        };

        if upcoming.is_none() || upcoming != expected {
            if self.overrides.optional || self.overrides.default.is_some() {
                return Ok(0);
            }
            return Err(DecodeError::Encoding {
                reason: format!("expected identifier {expected:?} for wrapped element"),
            });
        }

        match self.overrides.tagging {
            Tagging::Explicit(_) => {
                let outer_tlv = ber::read_tlv(input, codec)?;
                let mut borrowed = self.element.borrow_mut();
                let inner = borrowed.as_mut().expect("materialized above");
                let consumed = inner.decode(outer_tlv.content, codec)?;
                if consumed != outer_tlv.content.len() {
                    return Err(DecodeError::Encoding {
                        reason: "explicit wrapper content has trailing bytes".into(),
                    });
                }
                Ok(outer_tlv.consumed)
            }
            Tagging::None if self.overrides.class.is_none() && self.overrides.constructed.is_none() => {
                let mut borrowed = self.element.borrow_mut();
                let inner = borrowed.as_mut().expect("materialized above");
                inner.decode(input, codec)
            }
            _ => {
                // Implicit, or a plain class/constructed relabel: the wire
                // identifier belongs to this wrapper, not the wrapped
                // element, so re-frame the content under the inner
                // element's own identifier before delegating.
                let outer_tlv = ber::read_tlv(input, codec)?;
                let mut borrowed = self.element.borrow_mut();
                let inner = borrowed.as_mut().expect("materialized above");
                let inner_identifier = inner.identifier().ok_or_else(|| DecodeError::Encoding {
                    reason: "cannot apply wrapper tagging to an element with no static identifier"
                        .into(),
                })?;
                let mut synthetic = Vec::new();
                ber::encode_tlv(inner_identifier, outer_tlv.content, &mut synthetic);
                let consumed = inner.decode(&synthetic, codec)?;
                if consumed != synthetic.len() {
                    return Err(DecodeError::Encoding {
                        reason: "wrapped element did not consume all relabeled content".into(),
                    });
                }
                Ok(outer_tlv.consumed)
            }
        }
    }

    /// Forces materialization and returns a mutable reference to the
    /// wrapped element, for callers assembling a tree (rather than
    /// decoding one) who need to reach through a lazy wrapper to set a
    /// value before the first [`Wrapper::encode`].
    pub fn force_mut(&mut self) -> &mut Element {
        self.ensure_materialized();
        self.element.get_mut().as_mut().expect("materialized above")
    }

    pub fn project(&self) -> Result<Projection, EncodeError> {
        self.ensure_materialized();
        let borrowed = self.element.borrow();
        borrowed.as_ref().expect("materialized above").to_projection()
    }
}

/// Convenience for building a wrapper whose override class is fixed at
/// construction, matching the common `class: :context` usage shown in
/// `spec.md` §6's option table.
pub fn context_wrapper(thunk: Rc<dyn Fn() -> Element>) -> Wrapper {
    Wrapper::new(Options::new().class(Class::Context), thunk)
}
