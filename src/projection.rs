//! `to_h`: a nested associative-map image of an [`Element`] tree
//! (`spec.md` §5 "to_h projection").

use crate::constructed::ConstructedKind;
use crate::element::Element;
use crate::error::EncodeError;

/// The result of projecting an [`Element`] tree. Mirrors the shapes
/// `spec.md` §5 describes: a scalar rendering of a leaf value, a name-keyed
/// map for SEQUENCE/SET/Model, a list for SEQUENCE OF/SET OF, and the
/// single-entry map a CHOICE collapses to once its alternative is known.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Leaf(String),
    /// An OPTIONAL element with no value, dropped from enclosing maps
    /// rather than emitted as e.g. `null` (`spec.md` §5 "skipping OPTIONAL
    /// children whose value is absent").
    Absent,
    Map(Vec<(String, Projection)>),
    List(Vec<Projection>),
}

pub fn project(element: &Element) -> Result<Projection, EncodeError> {
    match element {
        Element::Primitive(p) => Ok(match p.value() {
            Some(value) => Projection::Leaf(value.to_string()),
            None => Projection::Absent,
        }),
        Element::Any(a) => Ok(match a.raw_bytes()? {
            Some(bytes) => Projection::Leaf(bytes.iter().map(|b| format!("{b:02x}")).collect()),
            None => Projection::Absent,
        }),
        Element::Constructed(c) => {
            let Some(fields) = c.fields() else {
                return Ok(Projection::Leaf(
                    c.raw().unwrap_or(&[]).iter().map(|b| format!("{b:02x}")).collect(),
                ));
            };
            let mut entries = Vec::new();
            for field in fields {
                match project(&field.element)? {
                    Projection::Absent => continue,
                    projected => entries.push((field.name.clone(), projected)),
                }
            }
            // Set projects identically to Sequence (`spec.md` §5 names only
            // Sequence; Set shares the same field-map shape).
            Ok(Projection::Map(entries))
        }
        Element::Repeated(r) => {
            let mut items = Vec::with_capacity(r.elements().len());
            for element in r.elements() {
                let projected = match element {
                    // "when the element type is a Model, the outer key is unwrapped"
                    Element::Model(m) => m.root_projection()?,
                    other => project(other)?,
                };
                items.push(projected);
            }
            Ok(Projection::List(items))
        }
        Element::Choice(c) => match c.chosen() {
            Some(alt) => Ok(Projection::Map(vec![(
                alt.name.clone(),
                project(&alt.element)?,
            )])),
            None if c.options.optional => Ok(Projection::Absent),
            None => crate::error::ChosenNotSetSnafu {
                name: c.options.name.clone(),
            }
            .fail(),
        },
        Element::Wrapper(w) => w.project(),
        Element::Model(m) => m.to_projection(),
    }
}

impl Projection {
    /// Looks up a dotted path (`"a.b.0.c"`) through nested maps and lists,
    /// the nested-value-lookup operation of `spec.md` §5.
    pub fn lookup(&self, path: &str) -> Option<&Projection> {
        let mut current = self;
        for segment in path.split('.') {
            current = match current {
                Projection::Map(entries) => {
                    &entries.iter().find(|(name, _)| name == segment)?.1
                }
                Projection::List(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Projection::Leaf(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Primitive;
    use crate::tagging::Options;
    use crate::types::Kind;
    use crate::value::Value;

    #[test]
    fn sequence_projects_to_name_keyed_map_skipping_absent_optionals() {
        let mut present = Primitive::new(Kind::Integer { enum_table: None }, Options::new());
        present.set_value(Value::Integer(7.into())).unwrap();
        let absent = Primitive::new(Kind::Boolean, Options::new().optional());

        let seq = crate::constructed::Constructed::new(
            ConstructedKind::Sequence,
            Options::new(),
            vec![
                crate::constructed::Field {
                    name: "count".into(),
                    element: Element::Primitive(present),
                },
                crate::constructed::Field {
                    name: "flag".into(),
                    element: Element::Primitive(absent),
                },
            ],
        );

        let projection = project(&Element::Constructed(seq)).unwrap();
        assert_eq!(
            projection,
            Projection::Map(vec![("count".into(), Projection::Leaf("7".into()))])
        );
    }

    #[test]
    fn lookup_traverses_maps_and_lists() {
        let projection = Projection::Map(vec![(
            "items".into(),
            Projection::List(vec![Projection::Leaf("a".into()), Projection::Leaf("b".into())]),
        )]);
        assert_eq!(projection.lookup("items.1").unwrap().as_leaf(), Some("b"));
    }
}
