//! CHOICE: a sum type selected by matching identifier (`spec.md` §4.3).

use crate::ber;
use crate::codec::Codec;
use crate::element::Element;
use crate::error::{ChosenNotSetSnafu, DecodeError, EncodeError};
use crate::tagging::Options;

/// One named alternative of a CHOICE.
#[derive(Debug, Clone)]
pub struct Alternative {
    pub name: String,
    pub element: Element,
}

/// A CHOICE instance: an ordered list of alternatives plus which one (if
/// any) has been selected.
#[derive(Debug, Clone)]
pub struct Choice {
    pub options: Options,
    alternatives: Vec<Alternative>,
    chosen: Option<usize>,
}

impl Choice {
    pub fn new(options: Options, alternatives: Vec<Alternative>) -> Self {
        Self {
            options,
            alternatives,
            chosen: None,
        }
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub fn chosen(&self) -> Option<&Alternative> {
        self.chosen.map(|i| &self.alternatives[i])
    }

    pub fn chosen_mut(&mut self) -> Option<&mut Alternative> {
        self.chosen.map(move |i| &mut self.alternatives[i])
    }

    pub fn has_value(&self) -> bool {
        self.chosen.is_some()
    }

    /// Selects the alternative named `name` as the active one, returning a
    /// mutable reference to its element so the caller can assign a value.
    pub fn select(&mut self, name: &str) -> Option<&mut Element> {
        let index = self.alternatives.iter().position(|a| a.name == name)?;
        self.chosen = Some(index);
        Some(&mut self.alternatives[index].element)
    }

    /// A CHOICE has no identifier of its own; it borrows the chosen
    /// alternative's.
    pub fn identifier(&self) -> Option<crate::tag::Identifier> {
        self.chosen().and_then(|a| a.element.identifier())
    }

    /// Encodes the chosen alternative. Fails with `ChosenNotSet` unless a
    /// choice has been made and the CHOICE is optional.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        match self.chosen() {
            Some(alt) => alt
                .element
                .encode()
                .map_err(|e| e.named(alt.name.clone())),
            None if self.options.optional => Ok(Vec::new()),
            None => ChosenNotSetSnafu {
                name: self.options.name.clone(),
            }
            .fail(),
        }
    }

    /// Tries each alternative in declaration order, selecting the first
    /// whose identifier matches the upcoming bytes. If none matches and the
    /// CHOICE is not optional, fails with `NoMatchingAlternative`; if
    /// optional, consumes zero bytes and leaves no alternative chosen
    /// (`spec.md` §9's observed `(0, "")` behavior).
    pub fn decode(&mut self, input: &[u8], codec: Codec) -> Result<usize, DecodeError> {
        let upcoming = if input.is_empty() {
            None
        } else {
            ber::peek_identifier(input).ok()
        };

        if let Some(upcoming) = upcoming {
            for index in 0..self.alternatives.len() {
                let expected = self.alternatives[index].element.identifier();
                if expected != Some(upcoming) {
                    continue;
                }
                let name = self.alternatives[index].name.clone();
                match self.alternatives[index].element.decode(input, codec) {
                    Ok(consumed) => {
                        self.chosen = Some(index);
                        crate::tracer::record(crate::tracer::Event::ChoiceSelected { name: &name });
                        tracing::debug!(alternative = %name, "CHOICE alternative selected");
                        return Ok(consumed);
                    }
                    Err(e) => return Err(e.named(name)),
                }
            }
        }

        if self.options.optional {
            self.chosen = None;
            Ok(0)
        } else {
            Err(DecodeError::NoMatchingAlternative)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::primitive::Primitive;
    use crate::types::Kind;
    use crate::value::Value;

    fn leaf_choice() -> Choice {
        Choice::new(
            Options::new(),
            vec![
                Alternative {
                    name: "flag".into(),
                    element: Element::Primitive(Primitive::new(Kind::Boolean, Options::new())),
                },
                Alternative {
                    name: "count".into(),
                    element: Element::Primitive(Primitive::new(
                        Kind::Integer { enum_table: None },
                        Options::new(),
                    )),
                },
            ],
        )
    }

    #[test]
    fn decode_selects_alternative_by_identifier() {
        let mut choice = leaf_choice();
        let bytes = vec![0x02, 0x01, 0x2a];
        let consumed = choice.decode(&bytes, Codec::Der).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(choice.chosen().unwrap().name, "count");
    }

    #[test]
    fn encode_without_choice_fails() {
        let choice = leaf_choice();
        assert!(choice.encode().is_err());
    }

    #[test]
    fn optional_choice_with_no_match_consumes_nothing() {
        let mut choice = leaf_choice();
        choice.options.optional = true;
        let bytes = vec![0x04, 0x00]; // OCTET STRING, matches neither alternative
        let consumed = choice.decode(&bytes, Codec::Der).unwrap();
        assert_eq!(consumed, 0);
        assert!(choice.chosen().is_none());
    }

    #[test]
    fn non_optional_choice_with_no_match_errors() {
        let mut choice = leaf_choice();
        let bytes = vec![0x04, 0x00];
        assert!(matches!(
            choice.decode(&bytes, Codec::Der),
            Err(DecodeError::NoMatchingAlternative)
        ));
    }

    #[test]
    fn round_trips_chosen_value() {
        let mut choice = leaf_choice();
        if let Some(Element::Primitive(p)) = choice.select("flag") {
            p.set_value(Value::Boolean(true)).unwrap();
        }
        let encoded = choice.encode().unwrap();
        assert_eq!(encoded, vec![0x01, 0x01, 0xff]);

        let mut decoded = leaf_choice();
        decoded.decode(&encoded, Codec::Der).unwrap();
        assert_eq!(decoded.chosen().unwrap().name, "flag");
    }
}
