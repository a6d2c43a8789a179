#![doc = include_str!("../README.md")]

//! A BER/DER codec and dynamic schema ("Model") layer for ASN.1.
//!
//! The type graph is built from a single tagged union, [`element::Element`],
//! rather than per-type generic trait implementations — schemas are
//! assembled at runtime from [`model::Model`] declarations, not derived at
//! compile time. See [`model`] for the declaration API and [`element`] for
//! the node type every operation ultimately dispatches through.

pub mod any;
pub mod ber;
pub mod choice;
pub mod codec;
pub mod constructed;
pub mod element;
pub mod error;
pub mod model;
pub mod primitive;
pub mod projection;
pub mod tag;
pub mod tagging;
pub mod tracer;
pub mod types;
pub mod value;

#[doc(inline)]
pub use self::{
    codec::Codec,
    element::Element,
    error::{DecodeError, EncodeError, ModelValidationError},
    model::Model,
    projection::Projection,
    tag::{Class, Identifier, Tag},
    tagging::{Options, Tagging},
    value::Value,
};

/// Re-exports the pieces most callers need: the node and model types, the
/// two error enums, tagging/options, and the two codec variants.
pub mod prelude {
    pub use crate::any::Any;
    pub use crate::choice::{Alternative, Choice};
    pub use crate::codec::Codec;
    pub use crate::constructed::{Constructed, ConstructedKind, Field, Prototype, Repeated};
    pub use crate::element::Element;
    pub use crate::error::{DecodeError, EncodeError, ModelValidationError};
    pub use crate::model::Model;
    pub use crate::primitive::Primitive;
    pub use crate::projection::Projection;
    pub use crate::tag::{Class, Identifier, Tag};
    pub use crate::tagging::{Options, Tagging};
    pub use crate::types::Kind;
    pub use crate::value::Value;
    pub use crate::wrapper::Wrapper;
}

pub mod wrapper;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    /// The SEQUENCE { BOOLEAN, INTEGER, BIT STRING } scenario worked
    /// through by hand in the module-level docs of `constructed`, exercised
    /// here end to end through a `Model` rather than a bare `Constructed`.
    #[test]
    fn model_round_trips_mixed_sequence() {
        let mut flag = Primitive::new(Kind::Boolean, Options::new().name("flag"));
        flag.set_value(Value::Boolean(true)).unwrap();
        let mut count = Primitive::new(Kind::Integer { enum_table: None }, Options::new().name("count"));
        count.set_value(Value::Integer(42.into())).unwrap();

        let mut model = Model::build(
            "Demo",
            vec![
                Field { name: "flag".into(), element: Element::Primitive(flag) },
                Field { name: "count".into(), element: Element::Primitive(count) },
            ],
        )
        .unwrap();

        let encoded = model.to_der().unwrap();
        assert_eq!(
            encoded,
            vec![0x30, 0x08, 0x01, 0x01, 0xff, 0x02, 0x01, 0x2a]
        );

        let mut decoded = Model::build(
            "Demo",
            vec![
                Field {
                    name: "flag".into(),
                    element: Element::Primitive(Primitive::new(Kind::Boolean, Options::new())),
                },
                Field {
                    name: "count".into(),
                    element: Element::Primitive(Primitive::new(
                        Kind::Integer { enum_table: None },
                        Options::new(),
                    )),
                },
            ],
        )
        .unwrap();
        decoded.parse(&encoded, Codec::Der).unwrap();
        assert_eq!(
            decoded.get("count").unwrap().as_primitive().unwrap().value(),
            Some(&Value::Integer(42.into()))
        );
    }

    #[test]
    fn to_h_projects_model_to_nested_map() {
        let mut flag = Primitive::new(Kind::Boolean, Options::new().name("flag"));
        flag.set_value(Value::Boolean(false)).unwrap();

        let model = Model::build(
            "Demo",
            vec![Field { name: "flag".into(), element: Element::Primitive(flag) }],
        )
        .unwrap();

        let projected = model.value("Demo.flag").unwrap().unwrap();
        assert_eq!(projected.as_leaf(), Some("false"));
    }
}
