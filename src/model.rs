//! # Model layer (Component E)
//!
//! A `Model` is a named schema declaration: a root [`Element`] (almost
//! always a SEQUENCE) plus the name used for `to_h` keys, model lookup, and
//! error messages (`spec.md` §5/§6). [`Model::extend`] implements model
//! inheritance: a derived model's declaration can override fields a base
//! model declared and append new ones, per `spec.md` §6 "model inheritance
//! with override semantics".

use crate::codec::Codec;
use crate::constructed::{Constructed, ConstructedKind, Field};
use crate::element::Element;
use crate::error::{DecodeError, DuplicateNameSnafu, EncodeError, ModelValidationError};
use crate::projection::Projection;
use crate::tag::Identifier;
use crate::tagging::Options;

#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    root: Element,
}

impl Model {
    /// Builds a model from a field list, rejecting duplicate names up
    /// front (`spec.md` §6's uniqueness validation — a `ModelValidationError`
    /// raised at declaration time, never during encode/decode).
    pub fn build(name: impl Into<String>, fields: Vec<Field>) -> Result<Self, ModelValidationError> {
        let name = name.into();
        reject_duplicates(&fields)?;
        tracing::debug!(model = %name, fields = fields.len(), "model constructed");
        Ok(Self {
            root: Element::Constructed(Constructed::new(ConstructedKind::Sequence, Options::new(), fields)),
            name,
        })
    }

    /// Builds a model whose root already has a custom shape (e.g. a CHOICE
    /// or a SET) rather than the default SEQUENCE.
    pub fn build_with_root(name: impl Into<String>, root: Element) -> Self {
        Self { name: name.into(), root }
    }

    /// Builds a derived model: starts from `base`'s field list, applies
    /// `overrides` by name (replacing that field's element in place), then
    /// appends `additions`. Mirrors `spec.md` §6's inheritance-with-override
    /// description.
    pub fn extend(
        base: &Model,
        name: impl Into<String>,
        overrides: Vec<Field>,
        additions: Vec<Field>,
    ) -> Result<Self, ModelValidationError> {
        let mut fields = base
            .root
            .as_constructed()
            .and_then(|c| c.fields())
            .map(|f| f.to_vec())
            .unwrap_or_default();

        for over in overrides {
            match fields.iter_mut().find(|f| f.name == over.name) {
                Some(existing) => existing.element = over.element,
                None => fields.push(over),
            }
        }
        fields.extend(additions);
        Self::build(name, fields)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn identifier(&self) -> Option<Identifier> {
        self.root.identifier()
    }

    pub fn has_value(&self) -> bool {
        self.root.has_value()
    }

    pub fn options(&self) -> Options {
        self.root.options()
    }

    /// Looks up a named field on a SEQUENCE/SET-rooted model
    /// (`spec.md` §6 `model[name]`).
    pub fn get(&self, name: &str) -> Option<&Element> {
        self.root.as_constructed()?.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.root.as_constructed_mut()?.get_mut(name)
    }

    pub fn get_index(&self, index: usize) -> Option<&Element> {
        self.root.as_constructed()?.get_index(index)
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        self.root.encode().map_err(|e| e.named(self.name.clone()))
    }

    pub fn to_der(&self) -> Result<Vec<u8>, EncodeError> {
        self.encode()
    }

    pub fn decode(&mut self, input: &[u8], codec: Codec) -> Result<usize, DecodeError> {
        self.root
            .decode(input, codec)
            .map_err(|e| e.named(self.name.clone()))
    }

    /// Decodes a complete document, failing if bytes remain afterward
    /// (`spec.md` §5 `parse`).
    pub fn parse(&mut self, input: &[u8], codec: Codec) -> Result<(), DecodeError> {
        let consumed = self.decode(input, codec)?;
        if consumed != input.len() {
            return Err(DecodeError::Encoding {
                reason: format!(
                    "{} trailing bytes after decoding model {:?}",
                    input.len() - consumed,
                    self.name
                ),
            });
        }
        Ok(())
    }

    /// `to_h`: this model's name mapped to its root's projection
    /// (`spec.md` §5).
    pub fn to_projection(&self) -> Result<Projection, EncodeError> {
        Ok(Projection::Map(vec![(
            self.name.clone(),
            self.root.to_projection()?,
        )]))
    }

    /// The root's own projection, without this model's name wrapped around
    /// it — used when a `SequenceOf`/`SetOf` element type is a model
    /// (`spec.md` §5 "the outer key is unwrapped").
    pub fn root_projection(&self) -> Result<Projection, EncodeError> {
        self.root.to_projection()
    }

    /// Nested value lookup through this model's projection
    /// (`spec.md` §5's dotted-path lookup, e.g. `model.value("a.b.0.c")`).
    pub fn value(&self, path: &str) -> Result<Option<Projection>, EncodeError> {
        Ok(self.to_projection()?.lookup(path).cloned())
    }
}

fn reject_duplicates(fields: &[Field]) -> Result<(), ModelValidationError> {
    let mut seen = std::collections::HashSet::new();
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return DuplicateNameSnafu {
                name: field.name.clone(),
            }
            .fail();
        }
    }
    Ok(())
}
